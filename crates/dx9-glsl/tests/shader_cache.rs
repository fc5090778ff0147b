use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use dx9_glsl::{
    ShaderCache, ShaderCacheLookupSource, ShaderStage, TextureFormat, TranslateOptions,
};
use pretty_assertions::assert_eq;

fn opcode_token(op: u16, operand_count: u8) -> u32 {
    (op as u32) | (((operand_count as u32) + 1) << 24)
}

fn reg_token(regtype: u8, index: u32) -> u32 {
    let low3 = (regtype as u32) & 0x7;
    let high2 = (regtype as u32) & 0x18;
    0x8000_0000 | (low3 << 28) | (high2 << 8) | (index & 0x7FF)
}

fn to_bytes(tokens: &[u32]) -> Vec<u8> {
    tokens.iter().flat_map(|t| t.to_le_bytes()).collect()
}

/// `ps_2_0: mov r0, cN`
fn pixel_shader(n: u32) -> Vec<u8> {
    to_bytes(&[
        0xFFFF_0200,
        opcode_token(1, 2),
        reg_token(0, 0) | (0xF << 16),
        reg_token(2, n) | (0xE4 << 16),
        0x0000_FFFF,
    ])
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[test]
fn second_lookup_hits_memory() {
    init_tracing();
    let mut cache = ShaderCache::default();
    let bytes = pixel_shader(1);

    let first = cache.get_or_translate(ShaderStage::Pixel, &bytes).unwrap();
    assert_eq!(first.source, ShaderCacheLookupSource::Translated);
    let glsl = first.glsl.clone();

    let second = cache.get_or_translate(ShaderStage::Pixel, &bytes).unwrap();
    assert_eq!(second.source, ShaderCacheLookupSource::Memory);
    assert_eq!(second.glsl, glsl);
    assert_eq!(cache.len(), 1);
}

#[test]
fn failures_are_not_cached() {
    let mut cache = ShaderCache::default();
    let bytes = pixel_shader(1);

    assert!(cache.get_or_translate(ShaderStage::Vertex, &bytes).is_err());
    assert!(cache.is_empty());

    // Same bytes under the right stage still translate.
    let lookup = cache.get_or_translate(ShaderStage::Pixel, &bytes).unwrap();
    assert_eq!(lookup.source, ShaderCacheLookupSource::Translated);
}

#[test]
fn option_changes_invalidate() {
    let mut cache = ShaderCache::default();
    let bytes = pixel_shader(2);
    cache.get_or_translate(ShaderStage::Pixel, &bytes).unwrap();

    cache.set_options(TranslateOptions::default());
    assert_eq!(cache.len(), 1, "identical options keep entries");

    cache.set_options(TranslateOptions {
        sampler_formats: BTreeMap::from([(0, TextureFormat::Other(50))]),
        ..TranslateOptions::default()
    });
    assert!(cache.is_empty());
    let lookup = cache.get_or_translate(ShaderStage::Pixel, &bytes).unwrap();
    assert_eq!(lookup.source, ShaderCacheLookupSource::Translated);
}

#[test]
fn least_recently_used_entry_is_evicted() {
    let capacity = NonZeroUsize::new(1).unwrap();
    let mut cache = ShaderCache::new(TranslateOptions::default(), capacity);
    let a = pixel_shader(0);
    let b = pixel_shader(1);

    cache.get_or_translate(ShaderStage::Pixel, &a).unwrap();
    cache.get_or_translate(ShaderStage::Pixel, &b).unwrap();
    let again = cache.get_or_translate(ShaderStage::Pixel, &a).unwrap();
    assert_eq!(again.source, ShaderCacheLookupSource::Translated);
    assert_eq!(cache.len(), 1);
}
