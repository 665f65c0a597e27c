//! Render state carried through recursive elements and includes.

use crate::renderer::RenderError;

/// Tracks the chain of documents being rendered and the element depth.
///
/// Each `<include>` pushes its `src` before rendering the included document
/// and pops it afterwards, which bounds nesting and detects cycles. Elements
/// are counted the same way across document boundaries.
#[derive(Debug)]
pub struct RenderContext {
    /// Active include chain, outermost first.
    include_stack: Vec<String>,
    /// Maximum include depth.
    max_depth: usize,
    /// Elements currently being rendered.
    nesting: usize,
    /// Maximum element nesting.
    max_nesting: usize,
}

impl RenderContext {
    pub fn new(max_depth: usize, max_nesting: usize) -> Self {
        Self {
            include_stack: Vec::new(),
            max_depth,
            nesting: 0,
            max_nesting,
        }
    }

    /// Enter an element, failing once nesting passes the limit.
    pub fn enter_element(&mut self) -> Result<(), RenderError> {
        if self.nesting >= self.max_nesting {
            return Err(RenderError::MaxNestingExceeded {
                depth: self.max_nesting,
            });
        }
        self.nesting += 1;
        Ok(())
    }

    /// Leave the innermost element.
    pub fn leave_element(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    /// Check if a source is already being rendered.
    pub fn is_active(&self, src: &str) -> bool {
        self.include_stack.iter().any(|active| active == src)
    }

    /// Enter a document.
    ///
    /// Returns error if:
    /// - Maximum depth exceeded
    /// - Cycle detected (source already on the chain)
    pub fn push_include(&mut self, src: &str) -> Result<(), RenderError> {
        if self.include_stack.len() >= self.max_depth {
            return Err(RenderError::MaxDepthExceeded {
                depth: self.max_depth,
            });
        }
        if self.is_active(src) {
            let mut chain = self.include_stack.clone();
            chain.push(src.to_string());
            return Err(RenderError::CyclicInclude { chain });
        }
        self.include_stack.push(src.to_string());
        Ok(())
    }

    /// Leave the innermost document.
    pub fn pop_include(&mut self) {
        self.include_stack.pop();
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.include_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_reports_full_chain() {
        let mut ctx = RenderContext::new(8, 8);
        ctx.push_include("a.poml").unwrap();
        ctx.push_include("b.poml").unwrap();
        let err = ctx.push_include("a.poml").unwrap_err();
        match err {
            RenderError::CyclicInclude { chain } => {
                assert_eq!(chain, vec!["a.poml", "b.poml", "a.poml"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn depth_limit() {
        let mut ctx = RenderContext::new(2, 8);
        ctx.push_include("a").unwrap();
        ctx.push_include("b").unwrap();
        assert!(matches!(
            ctx.push_include("c"),
            Err(RenderError::MaxDepthExceeded { depth: 2 })
        ));
        ctx.pop_include();
        assert_eq!(ctx.depth(), 1);
        ctx.push_include("c").unwrap();
    }

    #[test]
    fn nesting_limit() {
        let mut ctx = RenderContext::new(8, 2);
        ctx.enter_element().unwrap();
        ctx.enter_element().unwrap();
        assert!(matches!(
            ctx.enter_element(),
            Err(RenderError::MaxNestingExceeded { depth: 2 })
        ));
        ctx.leave_element();
        ctx.enter_element().unwrap();
    }
}
