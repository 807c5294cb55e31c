//! Sequence parameter sets through both directions of the bitstream

use nd_core::VstreamError;
use nd_vstream::h264::profile;
use nd_vstream::{BitReader, Bitstream, SeqParm};

/// 320x240 baseline, constraint_set0/1, level 3.0
const BASELINE_320X240: [u8; 7] = [0x42, 0xc0, 0x1e, 0xda, 0x05, 0x07, 0xe4];

fn baseline() -> SeqParm {
    SeqParm {
        profile_idc: profile::BASELINE,
        constraint_set: 0xc0,
        level_idc: 30,
        chroma_format_idc: 1,
        pic_order_cnt_type: 2,
        max_num_ref_frames: 1,
        pic_width_in_mbs_minus1: 19,
        pic_height_in_map_units_minus1: 14,
        frame_mbs_only_flag: true,
        direct_8x8_inference_flag: true,
        ..Default::default()
    }
}

fn high_interlaced() -> SeqParm {
    let mut sps = SeqParm {
        profile_idc: profile::HIGH,
        level_idc: 40,
        seq_parameter_set_id: 3,
        chroma_format_idc: 1,
        bit_depth_luma_minus8: 2,
        bit_depth_chroma_minus8: 2,
        seq_scaling_matrix_present_flag: true,
        log2_max_frame_num_minus4: 5,
        pic_order_cnt_type: 1,
        offset_for_non_ref_pic: -2,
        offset_for_top_to_bottom_field: 1,
        num_ref_frames_in_pic_order_cnt_cycle: 3,
        offset_for_ref_frame: vec![4, -4, 0],
        max_num_ref_frames: 4,
        pic_width_in_mbs_minus1: 119,
        pic_height_in_map_units_minus1: 33,
        mb_adaptive_frame_field_flag: true,
        direct_8x8_inference_flag: true,
        frame_cropping_flag: true,
        frame_crop_bottom_offset: 4,
        ..Default::default()
    };

    // Flat 4x4 intra luma, a ramp for 8x8 intra luma, default 4x4 inter luma
    sps.scaling.list_present[0] = true;
    sps.scaling.lists_4x4[0] = [16; 16];
    sps.scaling.list_present[6] = true;
    for (i, v) in sps.scaling.lists_8x8[0].iter_mut().enumerate() {
        *v = 6 + (i as u32).min(40);
    }
    sps.scaling.list_present[3] = true;
    sps.scaling.use_default[3] = true;
    sps.scaling.lists_4x4[3] = [8; 16];
    sps
}

#[test]
fn test_baseline_known_bytes() {
    let sps = SeqParm::decode(&BASELINE_320X240).unwrap();
    assert_eq!(sps, baseline());
    assert_eq!(baseline().encode().unwrap(), BASELINE_320X240);
}

#[test]
fn test_high_profile_symmetry() {
    let sps = high_interlaced();
    let bytes = sps.encode().unwrap();
    assert_eq!(SeqParm::decode(&bytes).unwrap(), sps);
}

#[test]
fn test_trailing_bits_end_the_rbsp() {
    let bytes = high_interlaced().encode().unwrap();
    let mut reader = BitReader::new(&bytes);
    SeqParm::default().parse(&mut reader).unwrap();
    assert!(!reader.has_more_data().unwrap());
}

#[test]
fn test_cropping_must_be_flagged() {
    let sps = SeqParm {
        frame_crop_left_offset: 2,
        ..baseline()
    };
    assert_eq!(
        sps.encode(),
        Err(VstreamError::InferMismatch {
            expected: 0,
            actual: 2
        })
    );
}

#[test]
fn test_separate_colour_plane_needs_444() {
    let sps = SeqParm {
        profile_idc: profile::HIGH_444_PRED,
        separate_colour_plane_flag: true,
        ..high_interlaced()
    };
    assert!(matches!(
        sps.encode(),
        Err(VstreamError::InferMismatch { .. })
    ));

    let sps = SeqParm {
        chroma_format_idc: 3,
        ..sps
    };
    let bytes = sps.encode().unwrap();
    let decoded = SeqParm::decode(&bytes).unwrap();
    assert_eq!(decoded.chroma_array_type(), 0);
    assert_eq!(decoded, sps);
}

#[test]
fn test_unknown_profile_rejected() {
    let mut bytes = BASELINE_320X240;
    bytes[0] = 99;
    assert_eq!(
        SeqParm::decode(&bytes),
        Err(VstreamError::UnknownProfile(99))
    );
}

#[test]
fn test_vui_flag_unsupported() {
    // Flip the vui bit in front of the stop bit
    let mut bytes = BASELINE_320X240;
    bytes[6] = 0xec;
    assert_eq!(
        SeqParm::decode(&bytes),
        Err(VstreamError::Unsupported("VUI parameters"))
    );
}

#[test]
fn test_truncated_sps() {
    assert_eq!(
        SeqParm::decode(&BASELINE_320X240[..4]),
        Err(VstreamError::EndOfStream)
    );
}

#[test]
fn test_ref_frame_offsets_must_match_cycle() {
    let sps = SeqParm {
        num_ref_frames_in_pic_order_cnt_cycle: 2,
        offset_for_ref_frame: vec![5, 6, 7],
        ..high_interlaced()
    };
    assert_eq!(
        sps.encode(),
        Err(VstreamError::InferMismatch {
            expected: 2,
            actual: 3
        })
    );

    let sps = SeqParm {
        offset_for_ref_frame: vec![5],
        ..sps
    };
    assert_eq!(
        sps.encode(),
        Err(VstreamError::InferMismatch {
            expected: 2,
            actual: 1
        })
    );
}
