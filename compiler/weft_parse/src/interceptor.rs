//! Node interception hooks.
//!
//! An [`Interceptor`] sees every Text, ObjectAccessor and Call node as it
//! is finalized and may replace it. Interceptors run in registration order;
//! each receives the output of the previous one.

use bitflags::bitflags;
use weft_ir::Node;

use crate::ParsingState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterceptionPoint {
    /// A Text node was produced.
    TextProduced,
    /// An ObjectAccessor node was produced.
    AccessorProduced,
    /// A Call node was built from its arguments, before its body.
    CallOpened,
    /// A Call node received its last child.
    CallClosed,
}

bitflags! {
    /// Set of points an interceptor subscribes to.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct InterceptionPoints: u8 {
        const TEXT_PRODUCED = 1 << 0;
        const ACCESSOR_PRODUCED = 1 << 1;
        const CALL_OPENED = 1 << 2;
        const CALL_CLOSED = 1 << 3;
    }
}

impl From<InterceptionPoint> for InterceptionPoints {
    fn from(point: InterceptionPoint) -> Self {
        match point {
            InterceptionPoint::TextProduced => InterceptionPoints::TEXT_PRODUCED,
            InterceptionPoint::AccessorProduced => InterceptionPoints::ACCESSOR_PRODUCED,
            InterceptionPoint::CallOpened => InterceptionPoints::CALL_OPENED,
            InterceptionPoint::CallClosed => InterceptionPoints::CALL_CLOSED,
        }
    }
}

pub trait Interceptor: Send + Sync {
    fn points(&self) -> InterceptionPoints;

    /// Return the node to keep in place of `node`.
    ///
    /// At `CallOpened` the returned node receives the tag body; returning
    /// something other than a call or root wraps it in a root first.
    fn process(&self, node: Node, point: InterceptionPoint, state: &mut ParsingState<'_>) -> Node;
}

/// Run every interceptor subscribed to `point` over `node`.
pub(crate) fn intercept(
    interceptors: &[Box<dyn Interceptor>],
    node: Node,
    point: InterceptionPoint,
    state: &mut ParsingState<'_>,
) -> Node {
    let mask = InterceptionPoints::from(point);
    interceptors
        .iter()
        .filter(|interceptor| interceptor.points().intersects(mask))
        .fold(node, |node, interceptor| interceptor.process(node, point, state))
}
