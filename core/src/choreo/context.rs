use super::choreographer::Choreographer;
use super::directory::Directory;
use crate::hooks::EngineHooks;
use crate::ids::EntityId;

/// Everything a dispatch may touch outside its own actor.
pub struct Ctx<'a> {
    pub hooks: &'a mut dyn EngineHooks,
    pub directory: &'a mut dyn Directory,
}

impl<'a> Ctx<'a> {
    pub fn new(hooks: &'a mut dyn EngineHooks, directory: &'a mut dyn Directory) -> Self {
        Self { hooks, directory }
    }

    /// Cross-actor messaging on behalf of `source`.
    pub fn choreographer(&mut self, source: EntityId) -> Choreographer<'_> {
        Choreographer::new(source, &mut *self.hooks, &mut *self.directory)
    }
}
