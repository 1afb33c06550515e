use geom::m64;

/// Nested affine transforms. The identity floor is stored outside of the
/// saved entries, so the stack can never run empty.
#[derive(Debug, Clone)]
pub struct TransformStack {
    top: m64,
    saved: Vec<m64>,
}

/// transform stack has no elements to pop
#[derive(Debug, Clone, Copy, PartialEq, Eq, displaydoc::Display)]
pub struct Underflow;

impl Default for TransformStack {
    fn default() -> TransformStack {
        TransformStack::new()
    }
}

impl TransformStack {
    pub fn new() -> TransformStack {
        TransformStack { top: m64::IDENTITY, saved: Vec::new() }
    }

    pub fn top(&self) -> &m64 {
        &self.top
    }

    pub fn depth(&self) -> usize {
        self.saved.len() + 1
    }

    pub fn push(&mut self) {
        self.saved.push(self.top);
    }

    pub fn pop(&mut self) -> Result<(), Underflow> {
        self.top = self.saved.pop().ok_or(Underflow)?;
        Ok(())
    }

    /// `top := top * m`: `m` acts on geometry before everything already on
    /// the stack.
    pub fn right_multiply(&mut self, m: m64) {
        self.top = self.top * m;
    }
}

#[cfg(test)]
mod tests {
    use geom::v64;

    use super::*;

    #[test]
    fn push_pop_restores_top() {
        let mut stack = TransformStack::new();
        stack.right_multiply(m64::translate(v64(1.0, 2.0, 3.0)));
        let before = *stack.top();

        stack.push();
        assert_eq!(stack.depth(), 2);
        stack.right_multiply(m64::scale(v64(2.0, 2.0, 2.0)));
        assert_ne!(*stack.top(), before);

        stack.pop().unwrap();
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), before);
    }

    #[test]
    fn pop_at_floor_is_noop() {
        let mut stack = TransformStack::new();
        stack.right_multiply(m64::scale(v64(3.0, 3.0, 3.0)));
        let before = *stack.top();
        assert_eq!(stack.pop(), Err(Underflow));
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), before);
    }

    #[test]
    fn right_multiply_composes_in_written_order() {
        let t = m64::translate(v64(1.0, 0.0, 0.0));
        let s = m64::scale(v64(2.0, 2.0, 2.0));
        let mut stack = TransformStack::new();
        stack.right_multiply(t);
        stack.right_multiply(s);
        assert_eq!(*stack.top(), m64::IDENTITY * t * s);
    }
}
