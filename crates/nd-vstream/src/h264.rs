//! H.264 parameter set syntax
//!
//! Each `parse` method walks the syntax once through a [`Bitstream`], so
//! the same code decodes with a [`BitReader`] and encodes with a
//! [`BitWriter`].

use crate::bitstream::{BitReader, BitWriter, Bitstream, Result};
use nd_core::VstreamError;

/// `profile_idc` values
pub mod profile {
    pub const CAVLC_444: u32 = 44;
    pub const BASELINE: u32 = 66;
    pub const MAIN: u32 = 77;
    pub const SCALABLE_BASELINE: u32 = 83;
    pub const SCALABLE_HIGH: u32 = 86;
    pub const EXTENDED: u32 = 88;
    pub const HIGH: u32 = 100;
    pub const HIGH_10: u32 = 110;
    pub const MULTIVIEW_HIGH: u32 = 118;
    pub const HIGH_422: u32 = 122;
    pub const STEREO_HIGH: u32 = 128;
    pub const HIGH_444_PRED: u32 = 244;
}

/// Upper bound of `num_ref_frames_in_pic_order_cnt_cycle`
const MAX_REF_FRAMES_IN_CYCLE: u32 = 255;
/// Upper bound of the weight denominators
const MAX_LOG2_WEIGHT_DENOM: u32 = 7;

/// Delta-coded scaling list
///
/// Decoding fills `list` and sets `use_default` when the first delta
/// ends the list. Encoding stops at the longest run of repeated trailing
/// entries and ends the list with a delta to zero.
pub fn scaling_list<S: Bitstream>(s: &mut S, list: &mut [u32], use_default: &mut bool) -> Result<()> {
    let size = list.len();
    let mut last = 8u32;

    if s.is_decode() {
        let mut next = 8u32;
        for i in 0..size {
            if next != 0 {
                let mut delta = 0;
                s.se(&mut delta)?;
                next = (last as i64 + delta as i64).rem_euclid(256) as u32;
                *use_default = i == 0 && next == 0;
            }
            list[i] = if next != 0 { next } else { last };
            last = list[i];
        }
        return Ok(());
    }

    let mut halt = if *use_default { 0 } else { size };
    while halt >= 2 && list[halt - 1] == list[halt - 2] {
        halt -= 1;
    }
    for &scale in &list[..halt] {
        let mut delta = wrap_delta(scale, last);
        s.se(&mut delta)?;
        last = scale;
    }
    if halt != size {
        let mut delta = wrap_delta(0, last);
        s.se(&mut delta)?;
    }
    Ok(())
}

/// Difference `to - from` modulo 256, in `-128..128`
fn wrap_delta(to: u32, from: u32) -> i32 {
    let delta = (to as i64 - from as i64).rem_euclid(256) as i32;
    if delta >= 128 {
        delta - 256
    } else {
        delta
    }
}

/// Scaling matrix of a sequence parameter set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalingMatrix {
    pub list_present: [bool; 12],
    pub use_default: [bool; 12],
    pub lists_4x4: [[u32; 16]; 6],
    pub lists_8x8: [[u32; 64]; 6],
}

impl Default for ScalingMatrix {
    fn default() -> Self {
        Self {
            list_present: [false; 12],
            use_default: [false; 12],
            lists_4x4: [[0; 16]; 6],
            lists_8x8: [[0; 64]; 6],
        }
    }
}

impl ScalingMatrix {
    fn parse<S: Bitstream>(&mut self, s: &mut S, count: usize) -> Result<()> {
        for i in 0..count {
            s.flag(&mut self.list_present[i])?;
            if !self.list_present[i] {
                continue;
            }
            let list: &mut [u32] = match i {
                0..=5 => &mut self.lists_4x4[i],
                _ => &mut self.lists_8x8[i - 6],
            };
            scaling_list(s, list, &mut self.use_default[i])?;
        }
        Ok(())
    }
}

/// Sequence parameter set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeqParm {
    pub profile_idc: u32,
    pub constraint_set: u32,
    pub level_idc: u32,
    pub seq_parameter_set_id: u32,
    pub chroma_format_idc: u32,
    pub separate_colour_plane_flag: bool,
    pub bit_depth_luma_minus8: u32,
    pub bit_depth_chroma_minus8: u32,
    pub qpprime_y_zero_transform_bypass_flag: bool,
    pub seq_scaling_matrix_present_flag: bool,
    pub scaling: ScalingMatrix,
    pub log2_max_frame_num_minus4: u32,
    pub pic_order_cnt_type: u32,
    pub log2_max_pic_order_cnt_lsb_minus4: u32,
    pub delta_pic_order_always_zero_flag: bool,
    pub offset_for_non_ref_pic: i32,
    pub offset_for_top_to_bottom_field: i32,
    pub num_ref_frames_in_pic_order_cnt_cycle: u32,
    pub offset_for_ref_frame: Vec<i32>,
    pub max_num_ref_frames: u32,
    pub gaps_in_frame_num_value_allowed_flag: bool,
    pub pic_width_in_mbs_minus1: u32,
    pub pic_height_in_map_units_minus1: u32,
    pub frame_mbs_only_flag: bool,
    pub mb_adaptive_frame_field_flag: bool,
    pub direct_8x8_inference_flag: bool,
    pub frame_cropping_flag: bool,
    pub frame_crop_left_offset: u32,
    pub frame_crop_right_offset: u32,
    pub frame_crop_top_offset: u32,
    pub frame_crop_bottom_offset: u32,
    pub vui_parameters_present_flag: bool,
}

impl SeqParm {
    /// Decode an SPS RBSP (without the NAL header byte)
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut sps = Self::default();
        sps.parse(&mut BitReader::new(data))?;
        Ok(sps)
    }

    /// Encode into an RBSP with trailing bits
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = BitWriter::new();
        self.clone().parse(&mut writer)?;
        Ok(writer.finish())
    }

    pub fn parse<S: Bitstream>(&mut self, s: &mut S) -> Result<()> {
        use profile::*;

        s.u(&mut self.profile_idc, 8)?;
        s.u(&mut self.constraint_set, 8)?;
        s.u(&mut self.level_idc, 8)?;
        s.ue(&mut self.seq_parameter_set_id)?;

        match self.profile_idc {
            BASELINE | MAIN | EXTENDED => {
                s.infer(&mut self.chroma_format_idc, 1)?;
                s.infer(&mut self.separate_colour_plane_flag, false)?;
                s.infer(&mut self.bit_depth_luma_minus8, 0)?;
                s.infer(&mut self.bit_depth_chroma_minus8, 0)?;
                s.infer(&mut self.qpprime_y_zero_transform_bypass_flag, false)?;
                s.infer(&mut self.seq_scaling_matrix_present_flag, false)?;
            }
            HIGH | HIGH_10 | HIGH_422 | HIGH_444_PRED | CAVLC_444 | SCALABLE_BASELINE
            | SCALABLE_HIGH | MULTIVIEW_HIGH | STEREO_HIGH => {
                s.ue(&mut self.chroma_format_idc)?;
                if self.chroma_format_idc == 3 {
                    s.flag(&mut self.separate_colour_plane_flag)?;
                } else {
                    s.infer(&mut self.separate_colour_plane_flag, false)?;
                }
                s.ue(&mut self.bit_depth_luma_minus8)?;
                s.ue(&mut self.bit_depth_chroma_minus8)?;
                s.flag(&mut self.qpprime_y_zero_transform_bypass_flag)?;
                s.flag(&mut self.seq_scaling_matrix_present_flag)?;
                if self.seq_scaling_matrix_present_flag {
                    let count = if self.chroma_format_idc == 3 { 12 } else { 8 };
                    self.scaling.parse(s, count)?;
                }
            }
            other => {
                tracing::warn!("Unknown H.264 profile_idc {}", other);
                return Err(VstreamError::UnknownProfile(other));
            }
        }

        s.ue(&mut self.log2_max_frame_num_minus4)?;
        s.ue(&mut self.pic_order_cnt_type)?;
        match self.pic_order_cnt_type {
            0 => s.ue(&mut self.log2_max_pic_order_cnt_lsb_minus4)?,
            1 => {
                s.flag(&mut self.delta_pic_order_always_zero_flag)?;
                s.se(&mut self.offset_for_non_ref_pic)?;
                s.se(&mut self.offset_for_top_to_bottom_field)?;
                s.ue(&mut self.num_ref_frames_in_pic_order_cnt_cycle)?;
                let count = self.num_ref_frames_in_pic_order_cnt_cycle;
                if count > MAX_REF_FRAMES_IN_CYCLE {
                    return Err(VstreamError::ValueTooWide {
                        value: count as u64,
                        bits: 8,
                    });
                }
                if s.is_decode() {
                    self.offset_for_ref_frame.resize(count as usize, 0);
                } else if self.offset_for_ref_frame.len() != count as usize {
                    return Err(VstreamError::InferMismatch {
                        expected: count as i64,
                        actual: self.offset_for_ref_frame.len() as i64,
                    });
                }
                for offset in &mut self.offset_for_ref_frame {
                    s.se(offset)?;
                }
            }
            _ => {}
        }

        s.ue(&mut self.max_num_ref_frames)?;
        s.flag(&mut self.gaps_in_frame_num_value_allowed_flag)?;
        s.ue(&mut self.pic_width_in_mbs_minus1)?;
        s.ue(&mut self.pic_height_in_map_units_minus1)?;
        s.flag(&mut self.frame_mbs_only_flag)?;
        if !self.frame_mbs_only_flag {
            s.flag(&mut self.mb_adaptive_frame_field_flag)?;
        } else {
            s.infer(&mut self.mb_adaptive_frame_field_flag, false)?;
        }
        s.flag(&mut self.direct_8x8_inference_flag)?;
        s.flag(&mut self.frame_cropping_flag)?;

        let crop = [
            &mut self.frame_crop_left_offset,
            &mut self.frame_crop_right_offset,
            &mut self.frame_crop_top_offset,
            &mut self.frame_crop_bottom_offset,
        ];
        for offset in crop {
            if self.frame_cropping_flag {
                s.ue(offset)?;
            } else {
                s.infer(offset, 0)?;
            }
        }

        s.flag(&mut self.vui_parameters_present_flag)?;
        if self.vui_parameters_present_flag {
            return Err(VstreamError::Unsupported("VUI parameters"));
        }

        tracing::debug!(
            "SPS {}: profile {} level {}, {}x{} macroblocks",
            self.seq_parameter_set_id,
            self.profile_idc,
            self.level_idc,
            self.pic_width_in_mbs_minus1 + 1,
            self.pic_height_in_map_units_minus1 + 1
        );
        Ok(())
    }

    pub fn chroma_array_type(&self) -> u32 {
        if self.separate_colour_plane_flag {
            0
        } else {
            self.chroma_format_idc
        }
    }
}

/// Explicit weights of one reference picture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredWeight {
    pub luma_weight_flag: bool,
    pub luma_weight: i32,
    pub luma_offset: i32,
    pub chroma_weight_flag: bool,
    pub chroma_weight: [i32; 2],
    pub chroma_offset: [i32; 2],
}

/// Slice header prediction weight table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredWeightTable {
    pub luma_log2_weight_denom: u32,
    pub chroma_log2_weight_denom: u32,
    pub l0: Vec<PredWeight>,
    pub l1: Vec<PredWeight>,
}

impl PredWeightTable {
    /// `l1_refs` is zero unless the slice is bi-predicted. Encoding needs
    /// `l0` and `l1` to hold exactly that many entries.
    pub fn parse<S: Bitstream>(&mut self, s: &mut S, l0_refs: usize, l1_refs: usize) -> Result<()> {
        s.ue(&mut self.luma_log2_weight_denom)?;
        s.ue(&mut self.chroma_log2_weight_denom)?;
        let luma_default = default_weight(self.luma_log2_weight_denom)?;
        let chroma_default = default_weight(self.chroma_log2_weight_denom)?;

        for (list, refs) in [(&mut self.l0, l0_refs), (&mut self.l1, l1_refs)] {
            if s.is_decode() {
                list.resize(refs, PredWeight::default());
            } else if list.len() != refs {
                return Err(VstreamError::InferMismatch {
                    expected: refs as i64,
                    actual: list.len() as i64,
                });
            }
        }
        for entry in self.l0.iter_mut().chain(self.l1.iter_mut()) {
            entry.parse(s, luma_default, chroma_default)?;
        }
        Ok(())
    }
}

fn default_weight(log2_denom: u32) -> Result<i32> {
    if log2_denom > MAX_LOG2_WEIGHT_DENOM {
        return Err(VstreamError::ValueTooWide {
            value: log2_denom as u64,
            bits: 3,
        });
    }
    Ok(1 << log2_denom)
}

impl PredWeight {
    fn parse<S: Bitstream>(&mut self, s: &mut S, luma_default: i32, chroma_default: i32) -> Result<()> {
        s.flag(&mut self.luma_weight_flag)?;
        if self.luma_weight_flag {
            s.se(&mut self.luma_weight)?;
            s.se(&mut self.luma_offset)?;
        } else {
            s.infer(&mut self.luma_weight, luma_default)?;
            s.infer(&mut self.luma_offset, 0)?;
        }

        s.flag(&mut self.chroma_weight_flag)?;
        for i in 0..2 {
            if self.chroma_weight_flag {
                s.se(&mut self.chroma_weight[i])?;
                s.se(&mut self.chroma_offset[i])?;
            } else {
                s.infer(&mut self.chroma_weight[i], chroma_default)?;
                s.infer(&mut self.chroma_offset[i], 0)?;
            }
        }
        Ok(())
    }
}
