/**
 * Data models shared between CPU-side setup code and the GPU: the
 * interleaved quad vertex format and texture wrappers.
 */
pub mod texture;
pub mod vertex;
