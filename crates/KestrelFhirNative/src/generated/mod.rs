//! Output of the `kestrel-fhir-native-gen` generator, checked in so the
//! runtime crate builds without a generation step.

pub mod r4;
