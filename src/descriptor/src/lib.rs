//! Docker Descriptor - fluent Dockerfile object model.
//!
//! Build a Dockerfile as an ordered list of typed instructions, query and
//! remove them by kind, then export the result as Dockerfile text.
//!
//! ```
//! use docker_descriptor::DockerDescriptor;
//!
//! let mut descriptor = DockerDescriptor::new();
//! descriptor
//!     .set_from("ubuntu")
//!     .push_run(["apt-get update"])
//!     .push_expose([80, 443])
//!     .set_cmd(["./start.sh"]);
//!
//! let text = descriptor.export_as_string().unwrap();
//! assert_eq!(text, "FROM ubuntu\nRUN apt-get update\nEXPOSE 80 443\nCMD ./start.sh\n");
//! ```

pub mod docker;

// Re-export common types
pub use docker::{
    Cardinality, Cursor, DockerDescriptor, DockerfileExporter, Exporter, Instruction,
    InstructionKind, Variant,
};
pub use docker::{
    AddInstruction, ArgInstruction, CmdInstruction, CommentInstruction, CopyInstruction,
    EntrypointInstruction, EnvInstruction, ExposeInstruction, FromInstruction, LabelInstruction,
    MaintainerInstruction, OnBuildInstruction, RunInstruction, UserInstruction, VolumeInstruction,
    WorkdirInstruction,
};
pub use docker_descriptor_core::{DescriptorError, ExportConfig, LineEnding, Result};

/// Docker Descriptor version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
