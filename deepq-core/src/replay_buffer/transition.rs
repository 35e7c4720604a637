//! Transitions and batches of them.

/// One environment step `(s_t, a_t, s_t+1, r_t)`.
///
/// `next_state` is `None` if the transition ends an episode.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<O> {
    /// Observation before the action.
    pub state: O,

    /// Index of the action.
    pub action: usize,

    /// Observation after the action, `None` for a terminal transition.
    pub next_state: Option<O>,

    /// Reward.
    pub reward: f32,
}

impl<O> Transition<O> {
    /// Constructs a transition.
    pub fn new(state: O, action: usize, next_state: Option<O>, reward: f32) -> Self {
        Self {
            state,
            action,
            next_state,
            reward,
        }
    }

    /// Returns `true` if the transition ends an episode.
    pub fn is_terminal(&self) -> bool {
        self.next_state.is_none()
    }
}

/// A batch of transitions in struct-of-arrays layout.
#[derive(Clone, Debug)]
pub struct TransitionBatch<O> {
    /// Observations before the actions.
    pub states: Vec<O>,

    /// Indices of the actions.
    pub actions: Vec<usize>,

    /// Observations after the actions, `None` for terminal transitions.
    pub next_states: Vec<Option<O>>,

    /// Rewards.
    pub rewards: Vec<f32>,
}

impl<O> TransitionBatch<O> {
    /// Returns the number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the batch has no transition.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Mask of non-terminal transitions.
    pub fn non_final_mask(&self) -> Vec<bool> {
        self.next_states.iter().map(Option::is_some).collect()
    }

    /// Next states of non-terminal transitions, in batch order.
    pub fn non_final_next_states(&self) -> Vec<&O> {
        self.next_states.iter().flatten().collect()
    }
}

impl<O> std::iter::FromIterator<Transition<O>> for TransitionBatch<O> {
    fn from_iter<I: IntoIterator<Item = Transition<O>>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let (n, _) = iter.size_hint();
        let mut batch = Self {
            states: Vec::with_capacity(n),
            actions: Vec::with_capacity(n),
            next_states: Vec::with_capacity(n),
            rewards: Vec::with_capacity(n),
        };
        for tr in iter {
            batch.states.push(tr.state);
            batch.actions.push(tr.action);
            batch.next_states.push(tr.next_state);
            batch.rewards.push(tr.reward);
        }
        batch
    }
}
