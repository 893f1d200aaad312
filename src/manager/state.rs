use crate::poller::ResourceHandle;
use crate::resource::Resource;

/// What the manager needs from a handle, independent of its payload type.
pub trait Mounted: Send + Sync {
    fn key(&self) -> &str;
    fn stop(&self);
    fn is_stopped(&self) -> bool;
}

impl<P: Resource> Mounted for ResourceHandle<P> {
    fn key(&self) -> &str {
        ResourceHandle::key(self)
    }

    fn stop(&self) {
        ResourceHandle::stop(self)
    }

    fn is_stopped(&self) -> bool {
        ResourceHandle::is_stopped(self)
    }
}
