// Licensed under the Apache-2.0 license

/// How registers seen again in a later document are matched.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MergeMode {
    /// A register is identified by its name.
    #[default]
    ByName,
    /// A register is identified by its address. A register arriving at an
    /// occupied address replaces the name and fields found there.
    ByAddress,
}

/// Options that control how input documents are merged into the model.
#[derive(Clone, Debug, Default)]
pub struct MergeConfig {
    pub mode: MergeMode,
}

impl MergeConfig {
    pub fn by_name() -> Self {
        Self {
            mode: MergeMode::ByName,
        }
    }

    pub fn by_address() -> Self {
        Self {
            mode: MergeMode::ByAddress,
        }
    }

    pub fn merge_by_address(&self) -> bool {
        self.mode == MergeMode::ByAddress
    }
}
