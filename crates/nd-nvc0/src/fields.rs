//! Fermi operand fields
//!
//! Registers:
//!
//!  - `$r0`-`$r62`: 32-bit general purpose registers, grouped into `$rNd`
//!    pairs for 64-bit values and `$rNq` quads for 128-bit values.
//!  - `$r63`: bit bucket on write, 0 on read.
//!  - `$p0`-`$p6`: 1-bit predicates; `$p7` is always true.
//!  - `$c`: condition code register (zero, sign, carry, overflow).
//!  - `$flags`: `$p0`-`$p6` at bits 0-6 and `$c` at bits 12-15.
//!
//! Multi-piece fields list their most significant piece first.

use nd_dis::{Atom, BitField, Mem, Reg, SpecialReg, TargetKind, VecGroup};

// Code targets

pub const CTARGOFF: BitField = BitField::new(26, 24).signed().plus(8).pc_relative();
pub const ACTARGOFF: BitField = BitField::new(26, 32);

pub const BTARG: Atom = Atom::Target(TargetKind::Branch, &CTARGOFF);
pub const CTARG: Atom = Atom::Target(TargetKind::Call, &CTARGOFF);
pub const NTARG: Atom = Atom::Target(TargetKind::Number, &CTARGOFF);
pub const ABTARG: Atom = Atom::Target(TargetKind::Branch, &ACTARGOFF);
pub const ACTARG: Atom = Atom::Target(TargetKind::Call, &ACTARGOFF);
pub const ANTARG: Atom = Atom::Target(TargetKind::Number, &ACTARGOFF);

// Immediates

pub const BAROFF: BitField = BitField::new(0x14, 4);
pub const PMOFF: BitField = BitField::new(0x1a, 16);
pub const TCNTOFF: BitField = BitField::new(0x1a, 12);
pub const IMMOFF: BitField = BitField::new(0x1a, 20).signed();
/// Top 20 bits of an f32
pub const FIMMOFF: BitField = BitField::new(0x1a, 20).shifted(12);
/// Top 20 bits of an f64
pub const DIMMOFF: BitField = BitField::new(0x1a, 20).shifted(44);
pub const LIMMOFF: BitField = BitField::new(0x1a, 32).wrapping();
pub const VIMMOFF: BitField = BitField::new(0x1a, 16);
pub const V4IMMOFF: BitField = BitField::new(0x1a, 8);
pub const SHCNTOFF: BitField = BitField::new(5, 5);
pub const BNUMOFF: BitField = BitField::new(0x37, 2);
pub const HNUMOFF: BitField = BitField::new(0x38, 1);

pub const BAR: Atom = Atom::Imm(&BAROFF);
pub const PM: Atom = Atom::Imm(&PMOFF);
pub const TCNT: Atom = Atom::Imm(&TCNTOFF);
pub const IMM: Atom = Atom::Imm(&IMMOFF);
pub const FIMM: Atom = Atom::Imm(&FIMMOFF);
pub const DIMM: Atom = Atom::Imm(&DIMMOFF);
pub const LIMM: Atom = Atom::Imm(&LIMMOFF);
pub const VIMM: Atom = Atom::Imm(&VIMMOFF);
pub const V4IMM: Atom = Atom::Imm(&V4IMMOFF);
pub const SHCNT: Atom = Atom::Imm(&SHCNTOFF);
pub const BNUM: Atom = Atom::Imm(&BNUMOFF);
pub const HNUM: Atom = Atom::Imm(&HNUMOFF);

// Register specials

pub const SREG_SR: &[SpecialReg] = &[
    SpecialReg::named(0x00, "laneid"),
    // bits 8-14: nwarpid, bits 20-28: nsmid
    SpecialReg::named(0x02, "nphysid"),
    // bits 8-12: warpid, bits 20-28: smid
    SpecialReg::named(0x03, "physid"),
    SpecialReg::named(0x04, "pm0"),
    SpecialReg::named(0x05, "pm1"),
    SpecialReg::named(0x06, "pm2"),
    SpecialReg::named(0x07, "pm3"),
    SpecialReg::named(0x10, "vtxcnt"),
    SpecialReg::named(0x11, "invoc"),
    SpecialReg::named(0x21, "tidx"),
    SpecialReg::named(0x22, "tidy"),
    SpecialReg::named(0x23, "tidz"),
    SpecialReg::named(0x25, "ctaidx"),
    SpecialReg::named(0x26, "ctaidy"),
    SpecialReg::named(0x27, "ctaidz"),
    SpecialReg::named(0x29, "ntidx"),
    SpecialReg::named(0x2a, "ntidy"),
    SpecialReg::named(0x2b, "ntidz"),
    SpecialReg::named(0x2c, "gridid"),
    SpecialReg::named(0x2d, "nctaidx"),
    SpecialReg::named(0x2e, "nctaidy"),
    SpecialReg::named(0x2f, "nctaidz"),
    // g[] address of s[] and l[]
    SpecialReg::named(0x30, "sbase"),
    SpecialReg::named(0x34, "lbase"),
    SpecialReg::named(0x37, "stackbase"),
    // lanemask semantics unknown
    SpecialReg::named(0x38, "lanemask_eq"),
    SpecialReg::named(0x39, "lanemask_lt"),
    SpecialReg::named(0x3a, "lanemask_le"),
    SpecialReg::named(0x3b, "lanemask_gt"),
    SpecialReg::named(0x3c, "lanemask_ge"),
    // unknown shift applied to clock
    SpecialReg::named(0x50, "clock"),
    SpecialReg::named(0x51, "clockhi"),
];
pub const REG_SR: &[SpecialReg] = &[SpecialReg::zero(63)];
pub const PRED_SR: &[SpecialReg] = &[SpecialReg::one(7)];

// Register fields

pub const DST_BF: BitField = BitField::new(0xe, 6);
pub const SRC1_BF: BitField = BitField::new(0x14, 6);
pub const SRC2_BF: BitField = BitField::new(0x1a, 6);
pub const SRC3_BF: BitField = BitField::new(0x31, 6);
pub const DST2_BF: BitField = BitField::new(0x2b, 6);
pub const PSRC1_BF: BitField = BitField::new(0x14, 3);
pub const PSRC2_BF: BitField = BitField::new(0x1a, 3);
pub const PSRC3_BF: BitField = BitField::new(0x31, 3);
pub const PRED_BF: BitField = BitField::new(0xa, 3);
pub const PDST_BF: BitField = BitField::new(0x11, 3);
pub const PDSTN_BF: BitField = BitField::new(0x0e, 3);
pub const PDST2_BF: BitField = BitField::new(0x36, 3);
pub const PDST3_BF: BitField = BitField::new(0x35, 3);
pub const PDST4_BF: BitField = BitField::new(0x32, 3);
/// High bit at 0x3a, low bits at 8
pub const PDSTL_BF: BitField = BitField::split(&[(0x3a, 1), (8, 2)]);
pub const TEX_BF: BitField = BitField::new(0x20, 7);
pub const SAMP_BF: BitField = BitField::new(0x28, 4);
pub const SURF_BF: BitField = BitField::new(0x1a, 3);
pub const SREG_BF: BitField = BitField::new(0x1a, 7);
pub const LDULD_DST2_BF: BitField = BitField::new(0x20, 6);

pub const DST_R: Reg = Reg::new(&DST_BF, "r").specials(REG_SR);
pub const DSTD_R: Reg = Reg::new(&DST_BF, "r").suffix("d");
pub const DSTQ_R: Reg = Reg::new(&DST_BF, "r").suffix("q");
pub const SRC1_R: Reg = Reg::new(&SRC1_BF, "r").specials(REG_SR);
pub const SRC1D_R: Reg = Reg::new(&SRC1_BF, "r").suffix("d");
pub const SRC2_R: Reg = Reg::new(&SRC2_BF, "r").specials(REG_SR);
pub const SRC2D_R: Reg = Reg::new(&SRC2_BF, "r").suffix("d");
pub const SRC3_R: Reg = Reg::new(&SRC3_BF, "r").specials(REG_SR);
pub const SRC3D_R: Reg = Reg::new(&SRC3_BF, "r").suffix("d");
pub const DST2_R: Reg = Reg::new(&DST2_BF, "r").specials(REG_SR);
pub const DST2D_R: Reg = Reg::new(&DST2_BF, "r").suffix("d");
pub const PSRC1_R: Reg = Reg::new(&PSRC1_BF, "p").specials(PRED_SR);
pub const PSRC2_R: Reg = Reg::new(&PSRC2_BF, "p").specials(PRED_SR);
pub const PSRC3_R: Reg = Reg::new(&PSRC3_BF, "p").specials(PRED_SR);
pub const PRED_R: Reg = Reg::new(&PRED_BF, "p").specials(PRED_SR);
pub const PDST_R: Reg = Reg::new(&PDST_BF, "p").specials(PRED_SR);
pub const PDSTN_R: Reg = Reg::new(&PDSTN_BF, "p").specials(PRED_SR);
pub const PDST2_R: Reg = Reg::new(&PDST2_BF, "p").specials(PRED_SR);
pub const PDST3_R: Reg = Reg::new(&PDST3_BF, "p").specials(PRED_SR);
pub const PDST4_R: Reg = Reg::new(&PDST4_BF, "p").specials(PRED_SR);
pub const PDSTL_R: Reg = Reg::new(&PDSTL_BF, "p").specials(PRED_SR);
pub const TEX_R: Reg = Reg::new(&TEX_BF, "t");
pub const SAMP_R: Reg = Reg::new(&SAMP_BF, "s");
pub const SURF_R: Reg = Reg::new(&SURF_BF, "g");
pub const CC_R: Reg = Reg::fixed("c");
pub const FLAGS_R: Reg = Reg::fixed("flags");
pub const SREG_R: Reg = Reg::new(&SREG_BF, "sr").specials(SREG_SR).always_special();
pub const LDULD_DST2_R: Reg = Reg::new(&LDULD_DST2_BF, "r");
pub const LDULD_DST2D_R: Reg = Reg::new(&LDULD_DST2_BF, "r").suffix("d");
pub const LDULD_DST2Q_R: Reg = Reg::new(&LDULD_DST2_BF, "r").suffix("q");

pub const DST: Atom = Atom::Reg(&DST_R);
pub const DSTD: Atom = Atom::Reg(&DSTD_R);
pub const DSTQ: Atom = Atom::Reg(&DSTQ_R);
pub const SRC1: Atom = Atom::Reg(&SRC1_R);
pub const SRC1D: Atom = Atom::Reg(&SRC1D_R);
pub const PSRC1: Atom = Atom::Reg(&PSRC1_R);
pub const SRC2: Atom = Atom::Reg(&SRC2_R);
pub const SRC2D: Atom = Atom::Reg(&SRC2D_R);
pub const PSRC2: Atom = Atom::Reg(&PSRC2_R);
pub const SRC3: Atom = Atom::Reg(&SRC3_R);
pub const SRC3D: Atom = Atom::Reg(&SRC3D_R);
pub const PSRC3: Atom = Atom::Reg(&PSRC3_R);
pub const DST2: Atom = Atom::Reg(&DST2_R);
pub const DST2D: Atom = Atom::Reg(&DST2D_R);
pub const PRED: Atom = Atom::Reg(&PRED_R);
pub const PDST: Atom = Atom::Reg(&PDST_R);
pub const PDSTN: Atom = Atom::Reg(&PDSTN_R);
pub const PDST2: Atom = Atom::Reg(&PDST2_R);
pub const PDST3: Atom = Atom::Reg(&PDST3_R);
pub const PDST4: Atom = Atom::Reg(&PDST4_R);
pub const PDSTL: Atom = Atom::Reg(&PDSTL_R);
pub const TEX: Atom = Atom::Reg(&TEX_R);
pub const SAMP: Atom = Atom::Reg(&SAMP_R);
pub const SURF: Atom = Atom::Reg(&SURF_R);
pub const CC: Atom = Atom::Reg(&CC_R);
pub const FLAGS: Atom = Atom::Reg(&FLAGS_R);
pub const SREG: Atom = Atom::Reg(&SREG_R);
pub const LDULD_DST2: Atom = Atom::Reg(&LDULD_DST2_R);
pub const LDULD_DST2D: Atom = Atom::Reg(&LDULD_DST2D_R);
pub const LDULD_DST2Q: Atom = Atom::Reg(&LDULD_DST2Q_R);

// Vector groups

pub const TDST_CNT: BitField = BitField::constant(4);
pub const TDST_MASK: BitField = BitField::new(0x2e, 4);
pub const TSRC_CNT: BitField = BitField::new(0x34, 2).plus(1);
pub const SADDR_CNT: BitField = BitField::new(0x2c, 2).plus(1);
pub const ESRC_CNT: BitField = BitField::new(5, 2).plus(1);

pub const TDST_V: VecGroup = VecGroup::new("r", &DST_BF, &TDST_CNT).masked(&TDST_MASK);
pub const TSRC_V: VecGroup = VecGroup::new("r", &SRC1_BF, &TSRC_CNT);
pub const SADDR_V: VecGroup = VecGroup::new("r", &SRC1_BF, &SADDR_CNT);
pub const ESRC_V: VecGroup = VecGroup::new("r", &SRC2_BF, &ESRC_CNT);
pub const VDST_V: VecGroup = VecGroup::new("r", &DST_BF, &ESRC_CNT);

pub const TDST: Atom = Atom::Vec(&TDST_V);
pub const TSRC: Atom = Atom::Vec(&TSRC_V);
pub const SADDR: Atom = Atom::Vec(&SADDR_V);
pub const ESRC: Atom = Atom::Vec(&ESRC_V);
pub const VDST: Atom = Atom::Vec(&VDST_V);

// Memory displacements

pub const GMEM_IMM: BitField = BitField::new(0x1a, 32).signed();
pub const GCMEM_IMM: BitField = BitField::new(0x1c, 30).signed().shifted(2);
/// High 3 bits at 0x37, low 17 bits at 0x1a
pub const GAMEM_IMM: BitField = BitField::split(&[(0x37, 3), (0x1a, 17)]).signed();
pub const SLMEM_IMM: BitField = BitField::new(0x1a, 24).signed();
pub const CMEM_IMM: BitField = BitField::new(0x1a, 16);
pub const FCMEM_IMM: BitField = BitField::new(0x1a, 16).signed();
pub const VMEM_IMM: BitField = BitField::new(0x20, 16);
pub const CMEM_IDX: BitField = BitField::new(0x2a, 4);
pub const VBA_IMM: BitField = BitField::new(0x1a, 6);

// Dual-load displacements, scaled by the access size
pub const LDULD_IMM: BitField = BitField::new(0x2b, 10).signed();
pub const LDULDS1_IMM: BitField = LDULD_IMM.shifted(1);
pub const LDULDS2_IMM: BitField = LDULD_IMM.shifted(2);
pub const LDULDS3_IMM: BitField = LDULD_IMM.shifted(3);
pub const LDULDS4_IMM: BitField = LDULD_IMM.shifted(4);
/// High 5 bits at 0x26, low 5 bits at 5
pub const LDULD2_IMM: BitField = BitField::split(&[(0x26, 5), (5, 5)]).signed();
pub const LDULD2S1_IMM: BitField = LDULD2_IMM.shifted(1);
pub const LDULD2S2_IMM: BitField = LDULD2_IMM.shifted(2);
pub const LDULD2S3_IMM: BitField = LDULD2_IMM.shifted(3);
pub const LDULD2S4_IMM: BitField = LDULD2_IMM.shifted(4);

// Memory operands

pub const GMEM_M: Mem = Mem::new("g", &GMEM_IMM).base(&SRC1_R);
pub const GDMEM_M: Mem = Mem::new("g", &GMEM_IMM).base(&SRC1D_R);
pub const GAMEM_M: Mem = Mem::new("g", &GAMEM_IMM).base(&SRC1_R);
pub const GADMEM_M: Mem = Mem::new("g", &GAMEM_IMM).base(&SRC1D_R);
pub const SMEM_M: Mem = Mem::new("s", &SLMEM_IMM).base(&SRC1_R);
pub const LMEM_M: Mem = Mem::new("l", &SLMEM_IMM).base(&SRC1_R);
pub const FCMEM_M: Mem = Mem::new("c", &FCMEM_IMM).bank(&CMEM_IDX).base(&SRC1_R);
pub const VMEM_M: Mem = Mem::new("v", &VMEM_IMM).base(&SRC1_R);
// Second register meaning unknown
pub const AMEM_M: Mem = Mem::new("a", &VMEM_IMM).base(&SRC1_R).index(&SRC2_R);
pub const CMEM_M: Mem = Mem::new("c", &CMEM_IMM).bank(&CMEM_IDX);
pub const LCMEM_M: Mem = Mem::new("l", &SLMEM_IMM).base(&SRC1_R);
pub const GCMEM_M: Mem = Mem::new("g", &GCMEM_IMM).base(&SRC1_R);
pub const GDCMEM_M: Mem = Mem::new("g", &GCMEM_IMM).base(&SRC1D_R);
/// Vertex base address, for tessellation and geometry programs
pub const VBA_M: Mem = Mem::bare(&VBA_IMM).base(&SRC1_R);

pub const LDULD_GMEM1_M: Mem = Mem::new("g", &LDULD_IMM).base(&SRC1_R);
pub const LDULD_GDMEM1_M: Mem = Mem::new("g", &LDULD_IMM).base(&SRC1D_R);
pub const LDULD_SMEM_M: Mem = Mem::new("s", &LDULD_IMM).base(&SRC1_R);
pub const LDULD_GMEM2_M: Mem = Mem::new("g", &LDULD2_IMM).base(&SRC2_R);
pub const LDULD_GDMEM2_M: Mem = Mem::new("g", &LDULD2_IMM).base(&SRC2D_R);
pub const LDULD_GMEM1S1_M: Mem = Mem::new("g", &LDULDS1_IMM).base(&SRC1_R);
pub const LDULD_GDMEM1S1_M: Mem = Mem::new("g", &LDULDS1_IMM).base(&SRC1D_R);
pub const LDULD_SMEMS1_M: Mem = Mem::new("s", &LDULDS1_IMM).base(&SRC1_R);
pub const LDULD_GMEM2S1_M: Mem = Mem::new("g", &LDULD2S1_IMM).base(&SRC2_R);
pub const LDULD_GDMEM2S1_M: Mem = Mem::new("g", &LDULD2S1_IMM).base(&SRC2D_R);
pub const LDULD_GMEM1S2_M: Mem = Mem::new("g", &LDULDS2_IMM).base(&SRC1_R);
pub const LDULD_GDMEM1S2_M: Mem = Mem::new("g", &LDULDS2_IMM).base(&SRC1D_R);
pub const LDULD_SMEMS2_M: Mem = Mem::new("s", &LDULDS2_IMM).base(&SRC1_R);
pub const LDULD_GMEM2S2_M: Mem = Mem::new("g", &LDULD2S2_IMM).base(&SRC2_R);
pub const LDULD_GDMEM2S2_M: Mem = Mem::new("g", &LDULD2S2_IMM).base(&SRC2D_R);
pub const LDULD_GMEM1S3_M: Mem = Mem::new("g", &LDULDS3_IMM).base(&SRC1_R);
pub const LDULD_GDMEM1S3_M: Mem = Mem::new("g", &LDULDS3_IMM).base(&SRC1D_R);
pub const LDULD_SMEMS3_M: Mem = Mem::new("s", &LDULDS3_IMM).base(&SRC1_R);
pub const LDULD_GMEM2S3_M: Mem = Mem::new("g", &LDULD2S3_IMM).base(&SRC2_R);
pub const LDULD_GDMEM2S3_M: Mem = Mem::new("g", &LDULD2S3_IMM).base(&SRC2D_R);
pub const LDULD_GMEM1S4_M: Mem = Mem::new("g", &LDULDS4_IMM).base(&SRC1_R);
pub const LDULD_GDMEM1S4_M: Mem = Mem::new("g", &LDULDS4_IMM).base(&SRC1D_R);
pub const LDULD_SMEMS4_M: Mem = Mem::new("s", &LDULDS4_IMM).base(&SRC1_R);
pub const LDULD_GMEM2S4_M: Mem = Mem::new("g", &LDULD2S4_IMM).base(&SRC2_R);
pub const LDULD_GDMEM2S4_M: Mem = Mem::new("g", &LDULD2S4_IMM).base(&SRC2D_R);

pub const GLOBAL: Atom = Atom::Mem(&GMEM_M);
pub const GLOBALD: Atom = Atom::Mem(&GDMEM_M);
pub const GATOM: Atom = Atom::Mem(&GAMEM_M);
pub const GATOMD: Atom = Atom::Mem(&GADMEM_M);
pub const SHARED: Atom = Atom::Mem(&SMEM_M);
pub const LOCAL: Atom = Atom::Mem(&LMEM_M);
pub const FCONST: Atom = Atom::Mem(&FCMEM_M);
pub const VAR: Atom = Atom::Mem(&VMEM_M);
pub const ATTR: Atom = Atom::Mem(&AMEM_M);
pub const CONST: Atom = Atom::Mem(&CMEM_M);
pub const VBASRC: Atom = Atom::Mem(&VBA_M);
pub const LCMEM: Atom = Atom::Mem(&LCMEM_M);
pub const GCMEM: Atom = Atom::Mem(&GCMEM_M);
pub const GDCMEM: Atom = Atom::Mem(&GDCMEM_M);

pub const LDULD_GLOBAL1: Atom = Atom::Mem(&LDULD_GMEM1_M);
pub const LDULD_GLOBALD1: Atom = Atom::Mem(&LDULD_GDMEM1_M);
pub const LDULD_GLOBAL2: Atom = Atom::Mem(&LDULD_GMEM2_M);
pub const LDULD_GLOBALD2: Atom = Atom::Mem(&LDULD_GDMEM2_M);
pub const LDULD_SHARED: Atom = Atom::Mem(&LDULD_SMEM_M);
pub const LDULD_GLOBAL1S1: Atom = Atom::Mem(&LDULD_GMEM1S1_M);
pub const LDULD_GLOBALD1S1: Atom = Atom::Mem(&LDULD_GDMEM1S1_M);
pub const LDULD_GLOBAL2S1: Atom = Atom::Mem(&LDULD_GMEM2S1_M);
pub const LDULD_GLOBALD2S1: Atom = Atom::Mem(&LDULD_GDMEM2S1_M);
pub const LDULD_SHAREDS1: Atom = Atom::Mem(&LDULD_SMEMS1_M);
pub const LDULD_GLOBAL1S2: Atom = Atom::Mem(&LDULD_GMEM1S2_M);
pub const LDULD_GLOBALD1S2: Atom = Atom::Mem(&LDULD_GDMEM1S2_M);
pub const LDULD_GLOBAL2S2: Atom = Atom::Mem(&LDULD_GMEM2S2_M);
pub const LDULD_GLOBALD2S2: Atom = Atom::Mem(&LDULD_GDMEM2S2_M);
pub const LDULD_SHAREDS2: Atom = Atom::Mem(&LDULD_SMEMS2_M);
pub const LDULD_GLOBAL1S3: Atom = Atom::Mem(&LDULD_GMEM1S3_M);
pub const LDULD_GLOBALD1S3: Atom = Atom::Mem(&LDULD_GDMEM1S3_M);
pub const LDULD_GLOBAL2S3: Atom = Atom::Mem(&LDULD_GMEM2S3_M);
pub const LDULD_GLOBALD2S3: Atom = Atom::Mem(&LDULD_GDMEM2S3_M);
pub const LDULD_SHAREDS3: Atom = Atom::Mem(&LDULD_SMEMS3_M);
pub const LDULD_GLOBAL1S4: Atom = Atom::Mem(&LDULD_GMEM1S4_M);
pub const LDULD_GLOBALD1S4: Atom = Atom::Mem(&LDULD_GDMEM1S4_M);
pub const LDULD_GLOBAL2S4: Atom = Atom::Mem(&LDULD_GMEM2S4_M);
pub const LDULD_GLOBALD2S4: Atom = Atom::Mem(&LDULD_GDMEM2S4_M);
pub const LDULD_SHAREDS4: Atom = Atom::Mem(&LDULD_SMEMS4_M);
