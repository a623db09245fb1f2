/// Tuning parameters for a tree, read once at construction.
///
/// Every field has a sensible default; most callers want
/// `TreeOptions::default()`. The block sizes trade allocator traffic against
/// slack: a tree keeps every block it ever allocated and reuses them across
/// recycles, so blocks should be sized for the steady-state document mix.
///
/// # Examples
///
/// ```rust
/// use jsonarbor::{JsonTree, TreeOptions};
///
/// let tree = JsonTree::new(TreeOptions {
///     node_block_nodes: 128,
///     intern_names: false,
///     ..TreeOptions::default()
/// });
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TreeOptions {
    /// Nodes carved from each arena block.
    ///
    /// # Default
    ///
    /// `32`
    pub node_block_nodes: usize,

    /// Preferred byte capacity of each string-store block. Strings longer
    /// than this get a block of their own.
    ///
    /// # Default
    ///
    /// `2048`
    pub store_block_bytes: usize,

    /// Whether to deduplicate object member names through the name table.
    ///
    /// With interning enabled, equal names anywhere in a tree share one
    /// canonical [`StrRef`], and path/name matching reduces to handle
    /// equality instead of a byte comparison.
    ///
    /// # Default
    ///
    /// `true`
    ///
    /// [`StrRef`]: crate::StrRef
    pub intern_names: bool,

    /// Ceiling on nodes allocated for one tree. Exceeding it mid-parse is an
    /// out-of-memory failure, which tears the tree down. `None` means
    /// unbounded.
    ///
    /// # Default
    ///
    /// `None`
    pub max_nodes: Option<usize>,

    /// Ceiling on bytes allocated to the string store, as above.
    ///
    /// # Default
    ///
    /// `None`
    pub max_store_bytes: Option<usize>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            node_block_nodes: 32,
            store_block_bytes: 2048,
            intern_names: true,
            max_nodes: None,
            max_store_bytes: None,
        }
    }
}
