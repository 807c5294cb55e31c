//! Slice header prediction weight tables

use nd_core::VstreamError;
use nd_vstream::h264::PredWeight;
use nd_vstream::{BitReader, BitWriter, Bitstream, PredWeightTable};

fn ue(w: &mut BitWriter, mut v: u32) {
    w.ue(&mut v).unwrap();
}

fn se(w: &mut BitWriter, mut v: i32) {
    w.se(&mut v).unwrap();
}

fn flag(w: &mut BitWriter, mut v: bool) {
    w.flag(&mut v).unwrap();
}

/// Denominators 5/2; l0 = [explicit luma, explicit chroma], l1 = [nothing explicit]
fn b_slice_table() -> Vec<u8> {
    let mut w = BitWriter::new();
    ue(&mut w, 5);
    ue(&mut w, 2);

    flag(&mut w, true);
    se(&mut w, 40);
    se(&mut w, -3);
    flag(&mut w, false);

    flag(&mut w, false);
    flag(&mut w, true);
    for (weight, offset) in [(3, -1), (5, 2)] {
        se(&mut w, weight);
        se(&mut w, offset);
    }

    flag(&mut w, false);
    flag(&mut w, false);
    w.finish()
}

fn decode(bytes: &[u8], l0_refs: usize, l1_refs: usize) -> PredWeightTable {
    let mut table = PredWeightTable::default();
    let mut reader = BitReader::new(bytes);
    table.parse(&mut reader, l0_refs, l1_refs).unwrap();
    assert!(!reader.has_more_data().unwrap());
    table
}

fn encode(table: &PredWeightTable, l0_refs: usize, l1_refs: usize) -> Result<Vec<u8>, VstreamError> {
    let mut writer = BitWriter::new();
    table.clone().parse(&mut writer, l0_refs, l1_refs)?;
    Ok(writer.finish())
}

#[test]
fn test_missing_weights_are_inferred() {
    let table = decode(&b_slice_table(), 2, 1);
    assert_eq!(table.luma_log2_weight_denom, 5);
    assert_eq!(table.chroma_log2_weight_denom, 2);

    assert_eq!(
        table.l0,
        vec![
            PredWeight {
                luma_weight_flag: true,
                luma_weight: 40,
                luma_offset: -3,
                chroma_weight_flag: false,
                chroma_weight: [4, 4],
                chroma_offset: [0, 0],
            },
            PredWeight {
                luma_weight_flag: false,
                luma_weight: 32,
                luma_offset: 0,
                chroma_weight_flag: true,
                chroma_weight: [3, 5],
                chroma_offset: [-1, 2],
            },
        ]
    );
    assert_eq!(
        table.l1,
        vec![PredWeight {
            luma_weight: 32,
            chroma_weight: [4, 4],
            ..Default::default()
        }]
    );
}

#[test]
fn test_table_reencodes_identically() {
    let bytes = b_slice_table();
    let table = decode(&bytes, 2, 1);
    assert_eq!(encode(&table, 2, 1).unwrap(), bytes);
}

#[test]
fn test_p_slice_has_no_l1() {
    let mut w = BitWriter::new();
    ue(&mut w, 0);
    ue(&mut w, 7);
    flag(&mut w, false);
    flag(&mut w, false);
    let bytes = w.finish();

    let table = decode(&bytes, 1, 0);
    assert!(table.l1.is_empty());
    assert_eq!(table.l0[0].luma_weight, 1);
    assert_eq!(table.l0[0].chroma_weight, [128, 128]);
    assert_eq!(encode(&table, 1, 0).unwrap(), bytes);
}

#[test]
fn test_empty_lists_only_carry_denominators() {
    let mut w = BitWriter::new();
    ue(&mut w, 3);
    ue(&mut w, 3);
    let table = decode(&w.finish(), 0, 0);
    assert!(table.l0.is_empty());
    assert!(table.l1.is_empty());
}

#[test]
fn test_decode_replaces_previous_entries() {
    let mut table = decode(&b_slice_table(), 2, 1);
    let mut w = BitWriter::new();
    ue(&mut w, 1);
    ue(&mut w, 1);
    flag(&mut w, false);
    flag(&mut w, false);
    let bytes = w.finish();

    table.parse(&mut BitReader::new(&bytes), 1, 0).unwrap();
    assert_eq!(table.l0.len(), 1);
    assert_eq!(table.l0[0].luma_weight, 2);
    assert!(table.l1.is_empty());
}

#[test]
fn test_encode_needs_matching_list_lengths() {
    let table = decode(&b_slice_table(), 2, 1);
    assert_eq!(
        encode(&table, 3, 1),
        Err(VstreamError::InferMismatch {
            expected: 3,
            actual: 2
        })
    );
    assert_eq!(
        encode(&table, 2, 0),
        Err(VstreamError::InferMismatch {
            expected: 0,
            actual: 1
        })
    );
}
