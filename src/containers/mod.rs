//! Container format parsers: DDS (legacy + DX10), KTX (KTX1/KTX2), and PVR (V1/V2/V3).

pub mod dds;
pub mod ktx;
pub mod pvr;
