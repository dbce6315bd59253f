pub mod config;
pub mod error;
pub mod fetch;
pub mod manager;
pub mod progress;
pub mod question;

#[cfg(test)]
pub(crate) mod testutil {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// A unique path under the system temp dir, removed on drop.
    pub(crate) struct TempPath(PathBuf);

    impl TempPath {
        pub(crate) fn new(name: &str) -> TempPath {
            let n = COUNTER.fetch_add(1, Ordering::SeqCst);
            let path = std::env::temp_dir().join(format!(
                "shinchoku-{}-{}-{}",
                name,
                std::process::id(),
                n
            ));
            let _ = std::fs::remove_dir_all(&path);
            let _ = std::fs::remove_file(&path);
            TempPath(path)
        }

        pub(crate) fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for TempPath {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
            let _ = std::fs::remove_file(&self.0);
        }
    }
}
