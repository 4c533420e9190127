//! Instruction factory.
//!
//! Maps a kind tag to a fresh, empty instruction record. Pure construction:
//! no state, no side effects.

use super::instruction::{
    AddInstruction, ArgInstruction, CmdInstruction, CommentInstruction, CopyInstruction,
    EntrypointInstruction, EnvInstruction, ExposeInstruction, FromInstruction, Instruction,
    LabelInstruction, MaintainerInstruction, OnBuildInstruction, RunInstruction, UserInstruction,
    Variant, VolumeInstruction, WorkdirInstruction,
};
use super::kind::InstructionKind;

/// Build an empty instruction of the given kind.
pub fn create(kind: InstructionKind) -> Instruction {
    match kind {
        InstructionKind::From => FromInstruction::default().into(),
        InstructionKind::Maintainer => MaintainerInstruction::default().into(),
        InstructionKind::Run => RunInstruction::default().into(),
        InstructionKind::Cmd => CmdInstruction::default().into(),
        InstructionKind::Expose => ExposeInstruction::default().into(),
        InstructionKind::Env => EnvInstruction::default().into(),
        InstructionKind::Add => AddInstruction::default().into(),
        InstructionKind::Copy => CopyInstruction::default().into(),
        InstructionKind::Entrypoint => EntrypointInstruction::default().into(),
        InstructionKind::Volume => VolumeInstruction::default().into(),
        InstructionKind::User => UserInstruction::default().into(),
        InstructionKind::Workdir => WorkdirInstruction::default().into(),
        InstructionKind::OnBuild => OnBuildInstruction::default().into(),
        InstructionKind::Comment => CommentInstruction::default().into(),
        InstructionKind::Label => LabelInstruction::default().into(),
        InstructionKind::Arg => ArgInstruction::default().into(),
    }
}

/// Build an empty instruction for the record type `T`.
pub fn create_variant<T: Variant>() -> Instruction {
    T::default().into()
}

impl InstructionKind {
    /// Build an empty instruction of this kind.
    pub fn create(self) -> Instruction {
        create(self)
    }
}
