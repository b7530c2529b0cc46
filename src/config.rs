//! Load-time options

use crate::types::DEFAULT_MAX_DIM;

/// Options controlling how a file is loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Maximum number of shape dimensions
    pub max_dim: usize,
    /// Maximum declared header length; `None` derives it from `max_dim`
    pub max_header_len: Option<usize>,
    /// Convert the payload to host byte order after loading
    pub normalize_byte_order: bool,
    /// Treat a repeated header key as a syntax error instead of overwriting
    pub reject_duplicate_keys: bool,
    /// Try the memory-mapped strategy before falling back to buffered reads
    pub allow_mmap: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_dim: DEFAULT_MAX_DIM,
            max_header_len: None,
            normalize_byte_order: true,
            reject_duplicate_keys: false,
            allow_mmap: true,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_dim(mut self, max_dim: usize) -> Self {
        self.max_dim = max_dim;
        self
    }

    pub fn with_max_header_len(mut self, len: usize) -> Self {
        self.max_header_len = Some(len);
        self
    }

    pub fn with_normalize_byte_order(mut self, normalize: bool) -> Self {
        self.normalize_byte_order = normalize;
        self
    }

    pub fn with_reject_duplicate_keys(mut self, reject: bool) -> Self {
        self.reject_duplicate_keys = reject;
        self
    }

    pub fn with_mmap(mut self, allow: bool) -> Self {
        self.allow_mmap = allow;
        self
    }

    /// Effective header length limit.
    ///
    /// Defaults to 1024 bytes of slack plus 20 characters per dimension.
    pub fn header_limit(&self) -> usize {
        self.max_header_len
            .unwrap_or_else(|| 1024 + self.max_dim.saturating_mul(20))
    }
}
