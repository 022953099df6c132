//! Shared machinery for mutating registry state against the remote API.
//!
//! Every mutating registry operation goes through a [`UnitOfWork`]: the
//! optimistic local change, the (retried) remote call and the compensating
//! rollback are one unit, so no operation hand-rolls its own recovery path.
//! [`KeyedSerializer`] gives each key a single writer so concurrent
//! mutations of one project's derived fields cannot interleave.

mod retry;
mod serializer;
mod unit_of_work;

pub use retry::RetryPolicy;
pub use serializer::KeyedSerializer;
pub use unit_of_work::UnitOfWork;
