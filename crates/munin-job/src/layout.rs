//! Qubit-layout codec.
//!
//! A transpiled circuit carries an assignment of virtual qubits (grouped by
//! named register) to physical qubit indices. The remote SDK renders each
//! virtual qubit as a human-readable key of the form
//!
//! ```text
//! QuantumRegister(5, 'code'), 3
//! ```
//!
//! and the persisted layout is a flat string-to-string mapping from that key
//! to the physical index. [`encode_layout`] produces exactly that mapping;
//! [`decode_layout`] parses it back into `{register: {qubit: physical}}`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Serialized form of one circuit layout: qubit key string to physical
/// index rendered as a decimal string.
pub type SerializedLayout = BTreeMap<String, String>;

/// Decoded form: register name to a qubit-index → physical-index mapping,
/// sorted ascending by qubit index.
pub type RegisterLayouts = BTreeMap<String, BTreeMap<u32, u32>>;

/// A reference to one virtual qubit inside a named register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QubitRef {
    /// Total size of the register the qubit belongs to.
    pub register_size: u32,
    /// Register name, e.g. `"code"` or `"ancilla"`.
    pub register_name: String,
    /// Index of the qubit within the register.
    pub qubit_index: u32,
}

impl QubitRef {
    /// Create a new qubit reference.
    pub fn new(register_size: u32, register_name: impl Into<String>, qubit_index: u32) -> Self {
        Self {
            register_size,
            register_name: register_name.into(),
            qubit_index,
        }
    }
}

impl fmt::Display for QubitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QuantumRegister({}, '{}'), {}",
            self.register_size, self.register_name, self.qubit_index
        )
    }
}

/// Virtual-to-physical qubit assignment for one circuit, in register order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranspileLayout {
    assignments: Vec<(QubitRef, u32)>,
}

impl TranspileLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a virtual qubit to a physical index.
    pub fn assign(mut self, qubit: QubitRef, physical: u32) -> Self {
        self.assignments.push((qubit, physical));
        self
    }

    /// Iterate over `(qubit, physical)` assignments.
    pub fn iter(&self) -> impl Iterator<Item = &(QubitRef, u32)> {
        self.assignments.iter()
    }

    /// Number of assigned qubits.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Check if the layout has no assignments.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Encode a circuit layout into its flat string mapping.
///
/// `None` means the circuit has no layout assigned and round-trips as
/// `None`, never as an empty mapping.
pub fn encode_layout(layout: Option<&TranspileLayout>) -> Option<SerializedLayout> {
    layout.map(|layout| {
        layout
            .iter()
            .map(|(qubit, physical)| (qubit.to_string(), physical.to_string()))
            .collect()
    })
}

/// Decode a flat layout mapping into `{register: {qubit: physical}}`.
///
/// Keys that do not match the `Register(size, 'name'), index` grammar are
/// skipped, as are values that are not decimal integers. This is deliberate
/// policy: a layout entry written by a newer SDK revision must not poison
/// the rest of the mapping. Both maps are ordered, so registers and qubit
/// indices come back sorted ascending.
///
/// An empty input decodes to an empty result.
pub fn decode_layout(serialized: &SerializedLayout) -> RegisterLayouts {
    let mut registers = RegisterLayouts::new();

    for (key, value) in serialized {
        let Some((name, qubit_index)) = parse_qubit_key(key) else {
            debug!("skipping unparseable layout key: {key:?}");
            continue;
        };
        let Ok(physical) = value.parse::<u32>() else {
            debug!("skipping non-numeric physical index {value:?} for key {key:?}");
            continue;
        };
        registers
            .entry(name.to_string())
            .or_default()
            .insert(qubit_index, physical);
    }

    registers
}

/// Parse a qubit key of the form `<Type>(<size>, '<name>'), <index>`.
///
/// Returns the register name and qubit index. The register type may be any
/// identifier (`QuantumRegister`, `AncillaRegister`, ...); the size is
/// validated as numeric but not otherwise used.
fn parse_qubit_key(key: &str) -> Option<(&str, u32)> {
    let (register_type, rest) = key.split_once('(')?;
    if register_type.is_empty() || !is_identifier(register_type) {
        return None;
    }

    let (inside, tail) = rest.split_once(')')?;
    let (size, name) = inside.split_once(',')?;
    size.trim().parse::<u32>().ok()?;

    let name = name
        .trim()
        .strip_prefix('\'')?
        .strip_suffix('\'')?;
    if name.is_empty() || !is_identifier(name) {
        return None;
    }

    let index = tail.strip_prefix(',')?.trim().parse::<u32>().ok()?;
    Some((name, index))
}

fn is_identifier(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_register_layout() -> TranspileLayout {
        TranspileLayout::new()
            .assign(QubitRef::new(2, "ancilla", 0), 0)
            .assign(QubitRef::new(2, "ancilla", 1), 1)
            .assign(QubitRef::new(2, "code", 0), 2)
            .assign(QubitRef::new(2, "code", 1), 3)
    }

    #[test]
    fn test_qubit_ref_display() {
        let q = QubitRef::new(5, "code", 3);
        assert_eq!(q.to_string(), "QuantumRegister(5, 'code'), 3");
    }

    #[test]
    fn test_encode_none_is_none() {
        assert_eq!(encode_layout(None), None);
    }

    #[test]
    fn test_encode_layout_keys_and_values() {
        let encoded = encode_layout(Some(&two_register_layout())).unwrap();
        assert_eq!(encoded.len(), 4);
        assert_eq!(
            encoded.get("QuantumRegister(2, 'ancilla'), 0"),
            Some(&"0".to_string())
        );
        assert_eq!(
            encoded.get("QuantumRegister(2, 'code'), 1"),
            Some(&"3".to_string())
        );
    }

    #[test]
    fn test_roundtrip_two_registers() {
        let encoded = encode_layout(Some(&two_register_layout())).unwrap();
        let decoded = decode_layout(&encoded);

        let ancilla: Vec<_> = decoded["ancilla"].iter().map(|(k, v)| (*k, *v)).collect();
        let code: Vec<_> = decoded["code"].iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(ancilla, vec![(0, 0), (1, 1)]);
        assert_eq!(code, vec![(0, 2), (1, 3)]);
    }

    #[test]
    fn test_decode_empty_is_empty() {
        let decoded = decode_layout(&SerializedLayout::new());
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_skips_malformed_keys() {
        let mut serialized = SerializedLayout::new();
        serialized.insert("QuantumRegister(2, 'q'), 0".to_string(), "5".to_string());
        serialized.insert("not a layout key".to_string(), "1".to_string());
        serialized.insert("QuantumRegister(x, 'q'), 1".to_string(), "2".to_string());
        serialized.insert("QuantumRegister(2, 'q'), 1".to_string(), "abc".to_string());

        let decoded = decode_layout(&serialized);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded["q"].len(), 1);
        assert_eq!(decoded["q"][&0], 5);
    }

    #[test]
    fn test_decode_accepts_ancilla_register_type() {
        let mut serialized = SerializedLayout::new();
        serialized.insert("AncillaRegister(1, 'anc'), 0".to_string(), "7".to_string());

        let decoded = decode_layout(&serialized);
        assert_eq!(decoded["anc"][&0], 7);
    }

    #[test]
    fn test_decode_sorted_ascending() {
        let mut serialized = SerializedLayout::new();
        // BTreeMap orders keys lexically, so "10" sorts before "2" on the
        // string side; the decoded map must still sort numerically.
        serialized.insert("QuantumRegister(11, 'q'), 10".to_string(), "10".to_string());
        serialized.insert("QuantumRegister(11, 'q'), 2".to_string(), "2".to_string());
        serialized.insert("QuantumRegister(11, 'q'), 1".to_string(), "1".to_string());

        let decoded = decode_layout(&serialized);
        let indices: Vec<_> = decoded["q"].keys().copied().collect();
        assert_eq!(indices, vec![1, 2, 10]);
    }

    proptest! {
        #[test]
        fn prop_roundtrip_single_register(
            name in "[a-z][a-z0-9_]{0,8}",
            assignments in proptest::collection::btree_map(0u32..64, 0u32..128, 0..16),
        ) {
            let size = assignments.len() as u32;
            let mut layout = TranspileLayout::new();
            for (&index, &physical) in &assignments {
                layout = layout.assign(QubitRef::new(size, name.clone(), index), physical);
            }

            let encoded = encode_layout(Some(&layout)).unwrap();
            let decoded = decode_layout(&encoded);

            if assignments.is_empty() {
                prop_assert!(decoded.is_empty());
            } else {
                prop_assert_eq!(decoded.len(), 1);
                prop_assert_eq!(&decoded[&name], &assignments);
            }
        }
    }
}
