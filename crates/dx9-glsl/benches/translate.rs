#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
#[cfg(not(target_arch = "wasm32"))]
use dx9_glsl::glsl::generate_body;
#[cfg(not(target_arch = "wasm32"))]
use dx9_glsl::{analyze, decode_tokens, translate, ShaderCache, ShaderStage, TranslateOptions};

#[cfg(not(target_arch = "wasm32"))]
fn opcode_token(op: u16, operand_count: u8) -> u32 {
    (op as u32) | (((operand_count as u32) + 1) << 24)
}

#[cfg(not(target_arch = "wasm32"))]
fn reg_token(regtype: u8, index: u32) -> u32 {
    let low3 = (regtype as u32) & 0x7;
    let high2 = (regtype as u32) & 0x18;
    0x8000_0000 | (low3 << 28) | (high2 << 8) | (index & 0x7FF)
}

#[cfg(not(target_arch = "wasm32"))]
fn dst(regtype: u8, index: u32, mask: u32) -> u32 {
    reg_token(regtype, index) | (mask << 16)
}

#[cfg(not(target_arch = "wasm32"))]
fn src(regtype: u8, index: u32) -> u32 {
    reg_token(regtype, index) | (0xE4 << 16)
}

/// vs_3_0 skinning-style shader: a 4x4 transform, a lit term and a texcoord copy inside a `rep`.
#[cfg(not(target_arch = "wasm32"))]
fn vs_3_0_transform() -> Vec<u32> {
    let mut tokens = vec![0xFFFE_0300];
    // dcl_position v0; dcl_normal v1; dcl_texcoord0 v2
    for (usage, register) in [(0, 0), (3, 1), (5, 2)] {
        tokens.extend([opcode_token(31, 2), 0x8000_0000 | usage, dst(1, register, 0xF)]);
    }
    // dcl_position o0; dcl_texcoord0 o1; dcl_color o2
    for (usage, register) in [(0, 0), (5, 1), (10, 2)] {
        tokens.extend([opcode_token(31, 2), 0x8000_0000 | usage, dst(6, register, 0xF)]);
    }
    // defi i0, 4, 0, 0, 0
    tokens.extend([opcode_token(48, 5), dst(7, 0, 0xF), 4, 0, 0, 0]);
    // m4x4 o0, v0, c0
    tokens.extend([opcode_token(20, 3), dst(6, 0, 0xF), src(1, 0), src(2, 0)]);
    // rep i0
    tokens.extend([opcode_token(38, 1), src(7, 0)]);
    // dp3 r0.x, v1, c4
    tokens.extend([opcode_token(8, 3), dst(0, 0, 0x1), src(1, 1), src(2, 4)]);
    // mad r1, r0.x, c5, r1
    tokens.extend([
        opcode_token(4, 4),
        dst(0, 1, 0xF),
        reg_token(0, 0),
        src(2, 5),
        src(0, 1),
    ]);
    // endrep
    tokens.push(opcode_token(39, 0));
    // mov o1, v2; mov o2, r1
    tokens.extend([opcode_token(1, 2), dst(6, 1, 0xF), src(1, 2)]);
    tokens.extend([opcode_token(1, 2), dst(6, 2, 0xF), src(0, 1)]);
    tokens.push(0x0000_FFFF);
    tokens
}

/// ps_2_0 shader: two texture reads blended by a constant, with a cmp select.
#[cfg(not(target_arch = "wasm32"))]
fn ps_2_0_blend() -> Vec<u32> {
    let mut tokens = vec![0xFFFF_0200];
    for sampler in 0..2 {
        tokens.extend([opcode_token(31, 2), 0x8000_0000 | (2 << 27), dst(10, sampler, 0xF)]);
    }
    tokens.extend([opcode_token(31, 2), 0x8000_0000, dst(3, 0, 0xF)]);
    for (register, sampler) in [(0, 0), (1, 1)] {
        tokens.extend([
            opcode_token(66, 3),
            dst(0, register, 0xF),
            src(3, 0),
            src(10, sampler),
        ]);
    }
    // lrp r2, c0, r0, r1
    tokens.extend([opcode_token(18, 4), dst(0, 2, 0xF), src(2, 0), src(0, 0), src(0, 1)]);
    // cmp r2, r2, r2, c1
    tokens.extend([opcode_token(88, 4), dst(0, 2, 0xF), src(0, 2), src(0, 2), src(2, 1)]);
    // mov oC0, r2
    tokens.extend([opcode_token(1, 2), dst(8, 0, 0xF), src(0, 2)]);
    tokens.push(0x0000_FFFF);
    tokens
}

#[cfg(not(target_arch = "wasm32"))]
fn bench_translation_stages(c: &mut Criterion) {
    let options = TranslateOptions::default();
    let shaders = [
        ("vs_3_0_transform", ShaderStage::Vertex, vs_3_0_transform()),
        ("ps_2_0_blend", ShaderStage::Pixel, ps_2_0_blend()),
    ];

    let mut group = c.benchmark_group("dx9_glsl_translation");

    for (name, _, tokens) in &shaders {
        group.bench_with_input(BenchmarkId::new("decode", name), tokens, |b, tokens| {
            b.iter(|| {
                let decoded = decode_tokens(black_box(tokens)).unwrap();
                black_box(decoded.instructions.len());
            })
        });
    }

    for (name, _, tokens) in &shaders {
        let decoded = decode_tokens(tokens).expect("bench shader should decode");
        group.bench_with_input(BenchmarkId::new("analyze", name), &decoded, |b, decoded| {
            b.iter(|| {
                let analysis = analyze(black_box(decoded)).unwrap();
                black_box(analysis.usage.max_loop_depth);
            })
        });

        let analysis = analyze(&decoded).expect("bench shader should analyze");
        group.bench_with_input(BenchmarkId::new("body", name), &decoded, |b, decoded| {
            b.iter(|| {
                let body = generate_body(black_box(decoded), &analysis, &options).unwrap();
                black_box(body.main.len());
            })
        });
    }

    for (name, stage, tokens) in &shaders {
        group.bench_with_input(BenchmarkId::new("translate", name), tokens, |b, tokens| {
            b.iter(|| {
                let shader = translate(*stage, black_box(tokens), &options).unwrap();
                black_box(shader.glsl.len());
            })
        });
    }

    group.finish();
}

#[cfg(not(target_arch = "wasm32"))]
fn bench_shader_cache(c: &mut Criterion) {
    let ps_bytes: Vec<u8> = ps_2_0_blend()
        .iter()
        .flat_map(|token| token.to_le_bytes())
        .collect();

    let mut group = c.benchmark_group("dx9_glsl_shader_cache");

    group.bench_function("key", |b| {
        b.iter(|| {
            let hash = blake3::hash(black_box(&ps_bytes));
            black_box(hash);
        })
    });

    let mut cache = ShaderCache::default();
    cache
        .get_or_translate(ShaderStage::Pixel, &ps_bytes)
        .expect("bench shader should translate");
    group.bench_function("lookup_hit", |b| {
        b.iter(|| {
            let lookup = cache
                .get_or_translate(ShaderStage::Pixel, black_box(&ps_bytes))
                .unwrap();
            black_box(lookup.source);
            black_box(lookup.glsl.len());
        })
    });

    group.finish();
}

#[cfg(not(target_arch = "wasm32"))]
criterion_group!(benches, bench_translation_stages, bench_shader_cache);
#[cfg(not(target_arch = "wasm32"))]
criterion_main!(benches);
