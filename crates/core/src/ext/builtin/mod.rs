//! Builtin Extensions.
//!
//! The declarative list every standard registry starts from. Each submodule
//! returns descriptors for one family; [`all`] concatenates them in a fixed
//! order so dispatch tie-breaking is reproducible.

/// RVC.
pub mod compressed;

/// F and D.
pub mod float;

/// I, M, A, Zba, Zbb, Zicond.
pub mod integer;

/// Machine, supervisor, hypervisor and debug architecture; Zicsr, Zifencei, Zicntr.
pub mod privileged;

/// V and the vector crypto/bit-manipulation subsets.
pub mod vector;

use super::ExtensionDesc;

/// Every builtin extension descriptor.
pub fn all() -> Vec<ExtensionDesc> {
    let mut list = Vec::new();
    list.extend(integer::extensions());
    list.extend(float::extensions());
    list.push(compressed::extension());
    list.extend(privileged::extensions());
    list.extend(vector::extensions());
    list
}
