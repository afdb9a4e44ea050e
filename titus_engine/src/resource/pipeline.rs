/// Pipeline resource trait

/// Pipeline abstraction supplied by an externally-loaded pipeline resource.
///
/// This is a marker trait - backend implementations carry the native
/// pipeline handle, pipeline layout and descriptor-set layout, and the
/// backend downcasts to its own type at bind time.
pub trait Pipeline: Send + Sync {
    // Marker trait - no public methods
}
