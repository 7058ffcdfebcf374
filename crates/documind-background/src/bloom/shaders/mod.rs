mod bloom;

pub use bloom::SHADER_BLOOM;
