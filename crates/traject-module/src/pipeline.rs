//! Startup validation of a module pipeline.
//!
//! Runs once after the def phase, before load: every structural error a
//! run can detect early is detected here, so nothing fails mid-step for
//! configuration reasons.

use crate::module::Module;
use crate::phase::PhaseSet;
use std::error::Error;
use std::fmt;
use traject_core::{SlotIdx, VarStore};

/// Errors from pipeline validation (startup-time, never per-step).
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineError {
    /// No modules declared.
    EmptyPipeline,
    /// A module was listed with an empty phase set.
    PhaselessModule {
        /// The module name.
        module: String,
    },
    /// Two list entries share a module name.
    DuplicateModule {
        /// The contested name.
        module: String,
    },
    /// A module declares a read of a slot nothing defined.
    UndefinedRead {
        /// The reading module.
        module: String,
        /// The missing slot.
        slot: SlotIdx,
    },
    /// A defined slot's owner tag names no module in the list.
    UnknownOwner {
        /// The slot.
        slot: SlotIdx,
        /// The owner tag it carries.
        owner: String,
    },
    /// A required co-module is absent or lacks required phases.
    MissingRequirement {
        /// The demanding module.
        module: String,
        /// The required co-module.
        required: String,
        /// The phases it must carry.
        phases: PhaseSet,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPipeline => write!(f, "pipeline has no modules"),
            Self::PhaselessModule { module } => {
                write!(f, "module '{module}' declared with no phases")
            }
            Self::DuplicateModule { module } => {
                write!(f, "module '{module}' listed twice")
            }
            Self::UndefinedRead { module, slot } => {
                write!(f, "module '{module}' reads undefined slot {slot}")
            }
            Self::UnknownOwner { slot, owner } => {
                write!(f, "slot {slot} owned by '{owner}', which is not in the module list")
            }
            Self::MissingRequirement {
                module,
                required,
                phases,
            } => write!(
                f,
                "module '{module}' requires '{required}' with phases {phases}"
            ),
        }
    }
}

impl Error for PipelineError {}

/// Validate a module pipeline against the store as populated by `def`.
///
/// Checks, in order:
///
/// 1. at least one module, each with a non-empty phase set, names unique;
/// 2. every declared read resolves to a defined slot;
/// 3. every defined slot's owner tag names a listed module (or one of
///    `builtin_owners` — the scheduler's own slots);
/// 4. every [`Requirement`](crate::Requirement) is satisfied.
///
/// Writer uniqueness needs no check here: `define` rejects duplicate
/// indices, so a slot has exactly one owner by construction.
pub fn validate_pipeline(
    modules: &[(Box<dyn Module>, PhaseSet)],
    store: &VarStore,
    builtin_owners: &[&str],
) -> Result<(), PipelineError> {
    if modules.is_empty() {
        return Err(PipelineError::EmptyPipeline);
    }
    for (module, phases) in modules {
        if *phases == PhaseSet::none() {
            return Err(PipelineError::PhaselessModule {
                module: module.name().to_string(),
            });
        }
    }
    for (i, (module, _)) in modules.iter().enumerate() {
        if modules[..i].iter().any(|(m, _)| m.name() == module.name()) {
            return Err(PipelineError::DuplicateModule {
                module: module.name().to_string(),
            });
        }
    }

    for (module, _) in modules {
        for slot in module.reads() {
            if store.def(slot).is_none() {
                return Err(PipelineError::UndefinedRead {
                    module: module.name().to_string(),
                    slot,
                });
            }
        }
    }

    for (slot, def, _) in store.iter_defined() {
        let known = builtin_owners.iter().any(|b| *b == def.module)
            || modules.iter().any(|(m, _)| m.name() == def.module);
        if !known {
            return Err(PipelineError::UnknownOwner {
                slot,
                owner: def.module.clone(),
            });
        }
    }

    for (module, _) in modules {
        for req in module.requires() {
            let satisfied = modules
                .iter()
                .any(|(m, phases)| m.name() == req.module && phases.contains(req.phases));
            if !satisfied {
                return Err(PipelineError::MissingRequirement {
                    module: module.name().to_string(),
                    required: req.module,
                    phases: req.phases,
                });
            }
        }
    }

    Ok(())
}
