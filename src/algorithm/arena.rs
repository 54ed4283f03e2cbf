//! Append-only interval store addressed by stable identifiers
//!
//! Splitting appends the right half as a new node and rewires the "next"
//! links, so domain order is recovered by following links from the head
//! rather than by storage position.

use crate::io::error::{Result, SamplerError, invalid_table};
use crate::sampling::interval::{Interval, IntervalId};

/// Construction-time node wrapping an interval
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    /// Interval data, mutated in place while refining
    pub interval: Interval,
    /// Unnormalized probability mass between the endpoints
    pub mass: f64,
    /// Right neighbour in domain order
    pub next: Option<IntervalId>,
}

/// Growable interval storage for refinement
#[derive(Clone, Debug, Default)]
pub struct IntervalArena {
    nodes: Vec<Node>,
}

impl IntervalArena {
    /// Create an arena holding one interval that covers the whole domain
    ///
    /// # Errors
    ///
    /// Returns an error if the initial allocation fails
    pub fn covering(left: f64, right: f64, mass: f64) -> Result<Self> {
        let mut arena = Self::default();
        arena.push(Node {
            interval: Interval::new(IntervalId::new(0), left, right, 0.0, 1.0),
            mass,
            next: None,
        })?;
        Ok(arena)
    }

    /// Identifier of the leftmost interval
    pub const fn head(&self) -> IntervalId {
        IntervalId::new(0)
    }

    /// Number of intervals created so far
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no intervals
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node with the given identifier
    pub fn get(&self, id: IntervalId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Mutable node with the given identifier
    pub fn get_mut(&mut self, id: IntervalId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Split `id` at domain point `midpoint` with CDF `cdf_midpoint`
    ///
    /// The existing node keeps the left half and links to a new node holding
    /// the right half, which inherits the old link.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot grow, or an invalid table error if
    /// `id` does not name an interval
    pub fn split(
        &mut self,
        id: IntervalId,
        midpoint: f64,
        cdf_midpoint: f64,
        left_mass: f64,
        right_mass: f64,
    ) -> Result<IntervalId> {
        let new_id = IntervalId::new(self.nodes.len());
        let node = self
            .get(id)
            .copied()
            .ok_or_else(|| unknown_interval(id))?;

        self.push(Node {
            interval: Interval::new(
                new_id,
                midpoint,
                node.interval.right,
                cdf_midpoint,
                node.interval.cdf_right,
            ),
            mass: right_mass,
            next: node.next,
        })?;

        let left = self.get_mut(id).ok_or_else(|| unknown_interval(id))?;
        left.interval.right = midpoint;
        left.interval.cdf_right = cdf_midpoint;
        left.mass = left_mass;
        left.next = Some(new_id);

        Ok(new_id)
    }

    /// Walk intervals in domain order by following links from the head
    pub fn linked(&self) -> Linked<'_> {
        Linked {
            arena: self,
            cursor: (!self.is_empty()).then(|| self.head()),
        }
    }

    /// Consume the arena into intervals sorted by left CDF value
    ///
    /// Ties, which only occur for intervals whose CDF width collapsed below
    /// double precision, are ordered by left domain endpoint.
    pub fn into_sorted(self) -> Vec<Interval> {
        let mut intervals: Vec<Interval> = self.nodes.into_iter().map(|n| n.interval).collect();
        intervals.sort_by(|a, b| {
            a.cdf_left
                .total_cmp(&b.cdf_left)
                .then_with(|| a.left.total_cmp(&b.left))
        });
        intervals
    }

    fn push(&mut self, node: Node) -> Result<()> {
        self.nodes
            .try_reserve(1)
            .map_err(|source| SamplerError::ResourceExhausted {
                intervals: self.nodes.len(),
                source,
            })?;
        self.nodes.push(node);
        Ok(())
    }
}

fn unknown_interval(id: IntervalId) -> SamplerError {
    invalid_table(format!("interval {id} is not in the arena"))
}

/// Iterator over arena nodes in domain order
pub struct Linked<'a> {
    arena: &'a IntervalArena,
    cursor: Option<IntervalId>,
}

impl<'a> Iterator for Linked<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.cursor?)?;
        self.cursor = node.next;
        Some(node)
    }
}
