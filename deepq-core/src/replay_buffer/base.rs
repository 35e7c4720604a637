//! Ring replay buffer.
use super::{ReplayBufferConfig, Transition, TransitionBatch};
use crate::{error::DeepqError, ExperienceBufferBase, ReplayBufferBase};
use anyhow::Result;
use rand::{rngs::StdRng, seq::index, SeedableRng};

/// A fixed-capacity ring buffer of transitions.
///
/// Once full, each push overwrites the oldest transition. Batches are drawn
/// uniformly without replacement.
pub struct ReplayBuffer<O> {
    capacity: usize,
    i: usize,
    memory: Vec<Transition<O>>,
    rng: StdRng,
}

impl<O> ReplayBuffer<O> {
    /// Returns the capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Draws `size` distinct transitions, by reference.
    ///
    /// Fails with [`DeepqError::InsufficientTransitions`] if the buffer holds
    /// fewer than `size` transitions.
    pub fn sample(&mut self, size: usize) -> Result<Vec<&Transition<O>>> {
        let available = self.memory.len();
        if size > available {
            return Err(DeepqError::InsufficientTransitions {
                requested: size,
                available,
            }
            .into());
        }
        let ixs = index::sample(&mut self.rng, available, size);
        let memory = &self.memory;
        Ok(ixs.into_iter().map(|ix| &memory[ix]).collect())
    }

    /// Iterates over the stored transitions in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Transition<O>> {
        self.memory.iter()
    }
}

impl<O> ExperienceBufferBase for ReplayBuffer<O> {
    type Item = Transition<O>;

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        if self.memory.len() < self.capacity {
            self.memory.push(tr);
        } else {
            self.memory[self.i] = tr;
        }
        self.i = (self.i + 1) % self.capacity;
        Ok(())
    }

    fn len(&self) -> usize {
        self.memory.len()
    }
}

impl<O: Clone> ReplayBufferBase for ReplayBuffer<O> {
    type Config = ReplayBufferConfig;
    type Batch = TransitionBatch<O>;

    fn build(config: &Self::Config) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            capacity,
            i: 0,
            memory: Vec::with_capacity(capacity.min(1 << 16)),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        Ok(self.sample(size)?.into_iter().cloned().collect())
    }

    fn n_samples(&self) -> usize {
        self.memory.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn buffer(capacity: usize) -> ReplayBuffer<usize> {
        ReplayBuffer::build(&ReplayBufferConfig::default().capacity(capacity))
    }

    fn tr(i: usize) -> Transition<usize> {
        let next = if i % 5 == 4 { None } else { Some(i + 1) };
        Transition::new(i, i % 4, next, i as f32)
    }

    #[test]
    fn test_keeps_most_recent_transitions() -> Result<()> {
        let mut buf = buffer(10);
        for i in 0..27 {
            buf.push(tr(i))?;
            assert!(buf.len() <= 10);
        }
        assert_eq!(buf.len(), 10);

        let stored: HashSet<usize> = buf.iter().map(|t| t.state).collect();
        let expected: HashSet<usize> = (17..27).collect();
        assert_eq!(stored, expected);
        Ok(())
    }

    #[test]
    fn test_sample_distinct() -> Result<()> {
        let mut buf = buffer(100);
        for i in 0..50 {
            buf.push(tr(i))?;
        }

        for _ in 0..20 {
            let batch = buf.batch(32)?;
            assert_eq!(batch.len(), 32);
            let states: HashSet<usize> = batch.states.iter().copied().collect();
            assert_eq!(states.len(), 32);
        }

        // Every stored transition is drawn when the batch covers the buffer
        let batch = buf.batch(50)?;
        let states: HashSet<usize> = batch.states.into_iter().collect();
        assert_eq!(states, (0..50).collect());
        Ok(())
    }

    #[test]
    fn test_batch_keeps_transition_fields() -> Result<()> {
        let mut buf = buffer(8);
        for i in 0..8 {
            buf.push(tr(i))?;
        }
        let batch = buf.batch(8)?;
        for j in 0..batch.len() {
            let s = batch.states[j];
            assert_eq!(batch.actions[j], s % 4);
            assert_eq!(batch.rewards[j], s as f32);
            assert_eq!(batch.next_states[j], tr(s).next_state);
        }
        assert_eq!(batch.non_final_next_states().len(), 7);
        Ok(())
    }

    #[test]
    fn test_sample_more_than_stored_fails() -> Result<()> {
        let mut buf = buffer(100);
        for i in 0..10 {
            buf.push(tr(i))?;
        }

        let err = buf.batch(11).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DeepqError>(),
            Some(&DeepqError::InsufficientTransitions {
                requested: 11,
                available: 10
            })
        );
        Ok(())
    }

    #[test]
    fn test_same_seed_same_batches() -> Result<()> {
        let mut buf1 = buffer(64);
        let mut buf2 = buffer(64);
        for i in 0..64 {
            buf1.push(tr(i))?;
            buf2.push(tr(i))?;
        }
        assert_eq!(buf1.batch(16)?.states, buf2.batch(16)?.states);
        Ok(())
    }
}
