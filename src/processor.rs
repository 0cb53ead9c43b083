use crate::block_state::BlockState;

/// Transforms each palette state on its way into the target during placement.
pub trait BlockStateProcessor: Send + Sync {
    fn process(&self, state: &BlockState) -> BlockState;
}

impl<F> BlockStateProcessor for F
where
    F: Fn(&BlockState) -> BlockState + Send + Sync,
{
    fn process(&self, state: &BlockState) -> BlockState {
        self(state)
    }
}

/// Replaces every occurrence of one block name with another, keeping properties.
#[derive(Debug, Clone)]
pub struct ReplaceBlock {
    from: String,
    to: String,
}

impl ReplaceBlock {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl BlockStateProcessor for ReplaceBlock {
    fn process(&self, state: &BlockState) -> BlockState {
        if state.get_name() == self.from {
            BlockState {
                name: self.to.as_str().into(),
                properties: state.properties.clone(),
            }
        } else {
            state.clone()
        }
    }
}
