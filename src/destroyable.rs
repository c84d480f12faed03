// implemented by entities whose outgoing references can be released before the entity itself goes away
pub trait Destroyable {
    fn destroy(&self);
}
