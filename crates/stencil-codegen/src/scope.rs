//! Variable scopes.
//!
//! A stack of frames mapping template variable names to their types. `if`,
//! `with`, and `range` bodies push a frame and pop it on exit, so variables
//! declared inside never leak out. Each specialization starts from a fresh
//! stack: a template body never sees its caller's variables.

use rustc_hash::FxHashMap;

use stencil_types::Ty;

pub struct Scopes {
    /// Index 0 is the outermost frame of the current specialization.
    frames: Vec<FxHashMap<String, Ty>>,
}

impl Scopes {
    /// A stack holding one empty frame.
    pub fn new() -> Self {
        Scopes {
            frames: vec![FxHashMap::default()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// # Panics
    ///
    /// Panics if only the outermost frame remains.
    pub fn pop(&mut self) {
        assert!(self.frames.len() > 1, "cannot pop the outermost scope");
        self.frames.pop();
    }

    /// Whether `name` is bound in the innermost frame. This alone decides
    /// between declaring and reassigning a variable.
    pub fn in_current(&self, name: &str) -> bool {
        self.frames
            .last()
            .is_some_and(|frame| frame.contains_key(name))
    }

    /// Bind `name` in the innermost frame, replacing any earlier binding
    /// there.
    pub fn declare(&mut self, name: &str, ty: Ty) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), ty);
        }
    }

    /// Search innermost to outermost.
    pub fn lookup(&self, name: &str) -> Option<&Ty> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}
