// assetguard-core/src/domain/checks/mod.rs
//
// Built-in rule set. Each check module exposes a `DESCRIPTOR`; declaring the
// module through `rule_set!` is what registers it.

use crate::domain::check::CheckDescriptor;

macro_rules! rule_set {
    ($($module:ident),+ $(,)?) => {
        $(pub mod $module;)+

        /// Descriptors of every built-in check, in declaration order.
        pub(crate) const BUILTIN: &[CheckDescriptor] = &[$($module::DESCRIPTOR),+];
    };
}

rule_set!(
    install_date,
    mandatory_fields,
    serviceown_cablenod,
    unitno_format,
);

pub use install_date::InstallDateNotInFutureCheck;
pub use mandatory_fields::MandatoryFieldsCheck;
pub use serviceown_cablenod::ServiceOwnRequiresLinkCheck;
pub use unitno_format::UnitNoFormatCheck;

#[cfg(test)]
pub(crate) mod fixtures;
