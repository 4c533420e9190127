//! Dockerfile object model.
//!
//! Provides instruction records, the descriptor container with its
//! singleton/multi accessors, cursor-based fluent navigation, and an
//! exporter that renders Dockerfile text.
//!
//! # Supported Instructions
//!
//! FROM, MAINTAINER, RUN, CMD, EXPOSE, ENV, ADD, COPY, ENTRYPOINT, VOLUME,
//! USER, WORKDIR, ONBUILD, LABEL, ARG and `#` comments

pub mod cursor;
pub mod descriptor;
pub mod export;
pub mod factory;
pub mod instruction;
pub mod kind;

pub use cursor::Cursor;
pub use descriptor::{DockerDescriptor, DESCRIPTOR_NAME};
pub use export::{DockerfileExporter, Exporter};
pub use instruction::{
    AddInstruction, ArgInstruction, CmdInstruction, CommentInstruction, CopyInstruction,
    EntrypointInstruction, EnvInstruction, ExposeInstruction, FromInstruction, Instruction,
    LabelInstruction, MaintainerInstruction, OnBuildInstruction, RunInstruction, UserInstruction,
    Variant, VolumeInstruction, WorkdirInstruction,
};
pub use kind::{Cardinality, InstructionKind};
