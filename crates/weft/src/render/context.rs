//! Render context tracking recursion state.

use crate::render::RenderError;

/// Tracks block-instantiation depth during recursive rendering.
///
/// Assigned block values render recursively; the depth cap turns a
/// pathologically deep assignment tree into an error instead of a stack
/// overflow.
pub(crate) struct RenderContext {
    depth: usize,
    max_depth: usize,
}

impl RenderContext {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
        }
    }

    /// Enter a block render. Errors once the depth cap is reached.
    pub(crate) fn push(&mut self) -> Result<(), RenderError> {
        if self.depth >= self.max_depth {
            return Err(RenderError::MaxDepthExceeded);
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave a block render.
    pub(crate) fn pop(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }
}
