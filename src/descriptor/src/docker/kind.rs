//! Instruction kind tags and their cardinality policy.

use serde::{Deserialize, Serialize};

/// Tag identifying the kind of a Dockerfile instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionKind {
    From,
    Maintainer,
    Run,
    Cmd,
    Expose,
    Env,
    Add,
    Copy,
    Entrypoint,
    Volume,
    User,
    Workdir,
    OnBuild,
    Comment,
    Label,
    Arg,
}

/// How the descriptor's convenience accessor treats an existing instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// The accessor reuses the first existing instance (get-or-create).
    Singleton,
    /// The accessor always appends a new instance.
    Multi,
}

impl InstructionKind {
    /// Every kind, in declaration order.
    pub const ALL: [InstructionKind; 16] = [
        Self::From,
        Self::Maintainer,
        Self::Run,
        Self::Cmd,
        Self::Expose,
        Self::Env,
        Self::Add,
        Self::Copy,
        Self::Entrypoint,
        Self::Volume,
        Self::User,
        Self::Workdir,
        Self::OnBuild,
        Self::Comment,
        Self::Label,
        Self::Arg,
    ];

    /// Dockerfile keyword that starts the rendered line.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::From => "FROM",
            Self::Maintainer => "MAINTAINER",
            Self::Run => "RUN",
            Self::Cmd => "CMD",
            Self::Expose => "EXPOSE",
            Self::Env => "ENV",
            Self::Add => "ADD",
            Self::Copy => "COPY",
            Self::Entrypoint => "ENTRYPOINT",
            Self::Volume => "VOLUME",
            Self::User => "USER",
            Self::Workdir => "WORKDIR",
            Self::OnBuild => "ONBUILD",
            Self::Comment => "#",
            Self::Label => "LABEL",
            Self::Arg => "ARG",
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            Self::From | Self::Maintainer | Self::Cmd | Self::Entrypoint | Self::User => {
                Cardinality::Singleton
            }
            _ => Cardinality::Multi,
        }
    }

    pub fn is_singleton(&self) -> bool {
        self.cardinality() == Cardinality::Singleton
    }
}

impl std::fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}
