//! Hierarchical transforms.
//!
//! A [`TransformStack`] composes matrices as they get pushed and keeps two products up to date:
//!
//! - The _model-view_ matrix, built out of model-view pushes only.
//! - The _model-view-projection_ matrix, built out of every push, projections included.
//!
//! Every push is tagged with a [`TransformKind`]. Popping must undo pushes in LIFO order and with the same kind; a
//! wrongly-kinded pop or a pop past the initial identity is reported as a [`TransformStackError`] and leaves the stack
//! untouched.
//!
//! ```
//! use glcore::linear::Matrix44;
//! use glcore::transform::TransformStack;
//!
//! let mut stack = TransformStack::new();
//! stack.push_projection(Matrix44::frustum(-2., 2., -2., 2., 1., 10.));
//! stack.push_model_view(Matrix44::translate(0., 0., -3.));
//!
//! assert_eq!(*stack.model_view(), Matrix44::translate(0., 0., -3.));
//!
//! stack.pop_model_view().unwrap();
//! stack.pop_projection().unwrap();
//! assert_eq!(stack.depth(), 1);
//! ```

use std::error;
use std::fmt;

use crate::linear::Matrix44;

/// Kind of a pushed matrix.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TransformKind {
  /// Projection matrix; only affects the model-view-projection product.
  Projection,
  /// Model-view matrix; affects both products.
  ModelView,
}

impl fmt::Display for TransformKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      TransformKind::Projection => f.write_str("projection"),
      TransformKind::ModelView => f.write_str("model-view"),
    }
  }
}

/// Errors a [`TransformStack`] can emit when popping.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransformStackError {
  /// The top of the stack was pushed with another kind than the one being popped.
  KindMismatch {
    expected: TransformKind,
    found: TransformKind,
  },
  /// Nothing left to pop but the initial identity.
  Underflow(TransformKind),
}

impl fmt::Display for TransformStackError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      TransformStackError::KindMismatch { expected, found } => write!(
        f,
        "cannot pop a {} matrix: top of stack is a {} matrix",
        expected, found
      ),

      TransformStackError::Underflow(kind) => {
        write!(f, "cannot pop a {} matrix: transform stack is empty", kind)
      }
    }
  }
}

impl error::Error for TransformStackError {}

#[derive(Clone, Debug)]
struct Entry {
  // None for the identity base
  kind: Option<TransformKind>,
  model_view: Matrix44,
  model_view_projection: Matrix44,
}

/// Stack of composed model-view and model-view-projection matrices.
#[derive(Clone, Debug)]
pub struct TransformStack {
  entries: Vec<Entry>,
  model_view_depth: usize,
}

impl TransformStack {
  /// A stack holding identity for both products.
  pub fn new() -> Self {
    let base = Entry {
      kind: None,
      model_view: Matrix44::identity(),
      model_view_projection: Matrix44::identity(),
    };

    TransformStack {
      entries: vec![base],
      model_view_depth: 1,
    }
  }

  fn top(&self) -> &Entry {
    // the base entry is never popped
    &self.entries[self.entries.len() - 1]
  }

  /// Push a matrix of the given kind, composing it on the right of the current products.
  pub fn push(&mut self, kind: TransformKind, m: Matrix44) {
    let top = self.top();
    let model_view_projection = top.model_view_projection.mult(&m);
    let model_view = match kind {
      TransformKind::Projection => top.model_view,
      TransformKind::ModelView => top.model_view.mult(&m),
    };

    if kind == TransformKind::ModelView {
      self.model_view_depth += 1;
    }

    self.entries.push(Entry {
      kind: Some(kind),
      model_view,
      model_view_projection,
    });
  }

  /// Undo the last push, which must be of the given kind.
  pub fn pop(&mut self, kind: TransformKind) -> Result<(), TransformStackError> {
    match self.top().kind {
      None => Err(TransformStackError::Underflow(kind)),

      Some(found) if found != kind => Err(TransformStackError::KindMismatch {
        expected: kind,
        found,
      }),

      Some(_) => {
        if kind == TransformKind::ModelView {
          self.model_view_depth -= 1;
        }

        self.entries.pop();
        Ok(())
      }
    }
  }

  pub fn push_projection(&mut self, m: Matrix44) {
    self.push(TransformKind::Projection, m)
  }

  pub fn push_model_view(&mut self, m: Matrix44) {
    self.push(TransformKind::ModelView, m)
  }

  pub fn pop_projection(&mut self) -> Result<(), TransformStackError> {
    self.pop(TransformKind::Projection)
  }

  pub fn pop_model_view(&mut self) -> Result<(), TransformStackError> {
    self.pop(TransformKind::ModelView)
  }

  /// Push a matrix, run the closure with the stack and pop the matrix back.
  ///
  /// Pushes and pops done by the closure must be balanced.
  pub fn scoped<F, R>(&mut self, kind: TransformKind, m: Matrix44, f: F) -> Result<R, TransformStackError>
  where
    F: FnOnce(&mut Self) -> R,
  {
    self.push(kind, m);
    let r = f(self);
    self.pop(kind).map(move |_| r)
  }

  /// Current model-view matrix.
  pub fn model_view(&self) -> &Matrix44 {
    &self.top().model_view
  }

  /// Current model-view-projection matrix.
  pub fn model_view_projection(&self) -> &Matrix44 {
    &self.top().model_view_projection
  }

  /// Number of matrices composing the model-view product, the identity base included.
  pub fn model_view_depth(&self) -> usize {
    self.model_view_depth
  }

  /// Number of matrices composing the model-view-projection product, the identity base included.
  pub fn model_view_projection_depth(&self) -> usize {
    self.entries.len()
  }

  /// Alias of [`TransformStack::model_view_projection_depth`].
  pub fn depth(&self) -> usize {
    self.entries.len()
  }
}

impl Default for TransformStack {
  fn default() -> Self {
    Self::new()
  }
}
