// src/dag/builder.rs

//! Fluent edge declaration.
//!
//! ```
//! # use std::time::Duration;
//! # use animdag::anim::TimedAnimation;
//! # use animdag::dag::Scheduler;
//! # fn main() -> animdag::errors::Result<()> {
//! let mut set = Scheduler::new("intro");
//! let fade = set.add(TimedAnimation::new("fade", Duration::from_millis(300)));
//! let slide = set.add(TimedAnimation::new("slide", Duration::from_millis(300)));
//! let bounce = set.add(TimedAnimation::new("bounce", Duration::from_millis(100)));
//!
//! // slide starts with fade; bounce starts once fade has ended.
//! set.play(fade)?.with(slide)?.before(bounce)?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use crate::anim::Pause;
use crate::errors::{AnimdagError, Result};
use crate::types::Rule;

use super::node::NodeId;
use super::scheduler::Scheduler;

/// Issues edges relative to one anchor node.
#[derive(Debug)]
pub struct Builder<'a> {
    scheduler: &'a mut Scheduler,
    current: NodeId,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(scheduler: &'a mut Scheduler, current: NodeId) -> Result<Self> {
        if scheduler.child(current).is_none() {
            return Err(AnimdagError::UnknownNode(current.index()));
        }
        Ok(Self { scheduler, current })
    }

    /// `other` starts when the anchor starts.
    pub fn with(self, other: NodeId) -> Result<Self> {
        self.scheduler.add_edge(other, self.current, Rule::With)?;
        Ok(self)
    }

    /// `other` starts when the anchor ends.
    pub fn before(self, other: NodeId) -> Result<Self> {
        self.scheduler.add_edge(other, self.current, Rule::After)?;
        Ok(self)
    }

    /// The anchor starts when `other` ends.
    pub fn after(self, other: NodeId) -> Result<Self> {
        self.scheduler.add_edge(self.current, other, Rule::After)?;
        Ok(self)
    }

    /// The anchor starts `delay` after the set starts, via a [`Pause`] node.
    pub fn after_delay(self, delay: Duration) -> Result<Self> {
        let gap = Pause::new(format!("delay-{}ms", delay.as_millis()), delay);
        let gap = self.scheduler.add(gap);
        self.after(gap)
    }

    pub fn anchor(&self) -> NodeId {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::{Animatable, TimedAnimation};

    #[test]
    fn after_delay_inserts_a_pause_ahead_of_the_anchor() {
        let mut set = Scheduler::new("gap");
        let fade = set.add(TimedAnimation::new("fade", Duration::from_millis(10)));

        let anchor = set
            .play(fade)
            .unwrap()
            .after_delay(Duration::from_millis(250))
            .unwrap()
            .anchor();
        assert_eq!(anchor, fade);

        let children = set.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].name, "delay-250ms");
        assert_eq!(children[0].edges.len(), 1);
        assert_eq!(children[0].edges[0].target, children[1].id);
        assert_eq!(children[0].edges[0].rule, Rule::After);

        let order = set.sorted_order().unwrap();
        assert_eq!(order, vec![children[1].id, fade]);
        assert_eq!(set.child(fade).unwrap().name(), "fade");
    }

    #[test]
    fn before_and_with_point_edges_at_the_anchor() {
        let mut set = Scheduler::new("fluent");
        let a = set.add(TimedAnimation::new("a", Duration::from_millis(10)));
        let b = set.add(TimedAnimation::new("b", Duration::from_millis(10)));
        let c = set.add(TimedAnimation::new("c", Duration::from_millis(10)));

        set.play(a).unwrap().with(b).unwrap().before(c).unwrap();

        let children = set.children();
        assert!(children[0].edges.is_empty());
        assert_eq!(children[1].edges[0].target, a);
        assert_eq!(children[1].edges[0].rule, Rule::With);
        assert_eq!(children[2].edges[0].target, a);
        assert_eq!(children[2].edges[0].rule, Rule::After);
    }
}
