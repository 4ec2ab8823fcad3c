//! Debugging feature flags. Only read in debug builds.

pub struct DebugFlags {
    /// Emit donor/acceptor classification for every transfer computation.
    pub print_donor_acceptor_split: bool,
    /// Emit one line per cluster while aggregating statistics.
    pub print_cluster_groups: bool,
    /// Emit the per-region sums before they are folded into subgroups.
    pub print_region_sums: bool,
    /// Emit the headers picked by feature vector selection.
    pub print_feature_headers: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_donor_acceptor_split: false,
    print_cluster_groups: false,
    print_region_sums: false,
    print_feature_headers: false,
};
