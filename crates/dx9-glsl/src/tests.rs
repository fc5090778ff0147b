use pretty_assertions::assert_eq;

use crate::analysis::analyze;
use crate::error::TranslateError;
use crate::glsl::generate_body;
use crate::options::TranslateOptions;
use crate::sm::decode::decode_tokens;
use crate::translate::translate_vertex_shader;

const END: u32 = 0x0000_FFFF;

fn enc_reg_type(ty: u8) -> u32 {
    let low = (ty & 0x7) as u32;
    let high = (ty & 0x18) as u32;
    (low << 28) | (high << 8)
}

fn enc_src(reg_type: u8, reg_num: u16, swizzle: u8) -> u32 {
    0x8000_0000 | enc_reg_type(reg_type) | (reg_num as u32) | ((swizzle as u32) << 16)
}

fn enc_dst(reg_type: u8, reg_num: u16, mask: u8) -> u32 {
    0x8000_0000 | enc_reg_type(reg_type) | (reg_num as u32) | ((mask as u32) << 16)
}

fn enc_inst(opcode: u16, params: &[u32]) -> Vec<u32> {
    let token = (opcode as u32) | (((params.len() as u32) + 1) << 24);
    let mut v = vec![token];
    v.extend_from_slice(params);
    v
}

fn enc_dcl(usage: u32, usage_index: u32, dst: u32) -> Vec<u32> {
    enc_inst(31, &[0x8000_0000 | usage | (usage_index << 16), dst])
}

fn shader(version: u32, instructions: &[Vec<u32>]) -> Vec<u32> {
    let mut tokens = vec![version];
    for inst in instructions {
        tokens.extend_from_slice(inst);
    }
    tokens.push(END);
    tokens
}

fn body_of(tokens: &[u32]) -> String {
    let decoded = decode_tokens(tokens).unwrap();
    let analysis = analyze(&decoded).unwrap();
    generate_body(&decoded, &analysis, &TranslateOptions::default())
        .unwrap()
        .main
}

#[test]
fn vs30_mov_from_attribute_full_program() {
    let tokens = shader(
        0xFFFE_0300,
        &[
            enc_dcl(0, 0, enc_dst(1, 0, 0xF)),
            enc_inst(1, &[enc_dst(0, 0, 0xF), enc_src(1, 0, 0xE4)]),
        ],
    );
    let translated = translate_vertex_shader(&tokens, &TranslateOptions::default()).unwrap();
    assert_eq!(
        translated.glsl,
        "#version 120\n\
         #extension GL_EXT_bindable_uniform : require\n\
         #extension GL_ARB_shader_texture_lod : require\n\
         \n\
         bindable uniform vec4 VConstFloat[256];\n\
         uniform ivec4 VConstInt[32];\n\
         bindable uniform bool VConstBool[32];\n\
         \n\
         vec4 OUT[12];\n\
         vec4 Temporary0;\n\
         attribute vec4 _Un_AttrPosition0;\n\
         vec4 Un_AttrPosition0 = _Un_AttrPosition0;\n\
         \n\
         vec4 InstrHelpTemp;\n\
         \n\
         void main()\n\
         {\n\
         Temporary0 = (Un_AttrPosition0.xyzw);\n\
         }\n"
    );
    assert!(!translated.glsl.contains("clamp"));
}

#[test]
fn analysis_is_idempotent() {
    let tokens = shader(
        0xFFFE_0300,
        &[
            enc_dcl(0, 0, enc_dst(1, 0, 0xF)),
            enc_dcl(5, 2, enc_dst(6, 1, 0x3)),
            enc_inst(0x51, &[enc_dst(2, 4, 0xF), 0x3F80_0000, 0, 0, 0]),
            enc_inst(
                2,
                &[enc_dst(6, 1, 0x3), enc_src(1, 0, 0xE4), enc_src(2, 4, 0xE4)],
            ),
        ],
    );
    let decoded = decode_tokens(&tokens).unwrap();
    let first = analyze(&decoded).unwrap();
    let second = analyze(&decoded).unwrap();
    assert_eq!(first, second);
    assert!(first.usage.packed_outputs[1].is_some());
    assert!(first.constants.is_local_float(4));
}

#[test]
fn dp3_broadcasts_only_multi_component_results() {
    let dp3 = |mask: u8| {
        shader(
            0xFFFE_0300,
            &[enc_inst(
                8,
                &[enc_dst(0, 0, mask), enc_src(0, 1, 0xE4), enc_src(0, 2, 0xE4)],
            )],
        )
    };
    assert_eq!(
        body_of(&dp3(0x1)),
        "Temporary0.x = ((dot(Temporary1.xyz,Temporary2.xyz)));\n"
    );
    assert_eq!(
        body_of(&dp3(0x3)),
        "Temporary0.xy = (vec2(dot(Temporary1.xyz,Temporary2.xyz)));\n"
    );
}

#[test]
fn cmp_with_aliased_source_goes_through_helper_temp() {
    // ps_2_0: cmp r0, r0, c0, c1
    let tokens = shader(
        0xFFFF_0200,
        &[enc_inst(
            88,
            &[
                enc_dst(0, 0, 0xF),
                enc_src(0, 0, 0xE4),
                enc_src(2, 0, 0xE4),
                enc_src(2, 1, 0xE4),
            ],
        )],
    );
    let body = body_of(&tokens);
    let lines: Vec<_> = body.lines().collect();
    assert_eq!(lines.len(), 5, "{body}");
    assert_eq!(
        lines[0],
        "InstrHelpTemp.r = ( ( Temporary0.r >= 0.0 ) ? PConstFloat[0].r : PConstFloat[1].r );"
    );
    assert_eq!(
        lines[3],
        "InstrHelpTemp.a = ( ( Temporary0.a >= 0.0 ) ? PConstFloat[0].a : PConstFloat[1].a );"
    );
    assert_eq!(lines[4], "Temporary0 = (InstrHelpTemp );");
    assert!(lines[..4].iter().all(|line| !line.starts_with("Temporary0")));
}

#[test]
fn cmp_groups_channels_by_selector_swizzle() {
    // ps_2_0: cmp r1.xyz, r0.xxy, c0, c1 -> x and y compare r0.x, z compares r0.y
    let tokens = shader(
        0xFFFF_0200,
        &[enc_inst(
            88,
            &[
                enc_dst(0, 1, 0x7),
                enc_src(0, 0, 0x50),
                enc_src(2, 0, 0xE4),
                enc_src(2, 1, 0xE4),
            ],
        )],
    );
    assert_eq!(
        body_of(&tokens),
        "Temporary1.rg = (( Temporary0.r >= 0.0 ) ? PConstFloat[0].rg : PConstFloat[1].rg );\n\
         Temporary1.b = (( Temporary0.g >= 0.0 ) ? PConstFloat[0].b : PConstFloat[1].b );\n"
    );
}

#[test]
fn matrix_multiply_expands_to_row_dot_products() {
    // vs_2_0: m4x3 r0, v0, c4
    let tokens = shader(
        0xFFFE_0200,
        &[
            enc_dcl(0, 0, enc_dst(1, 0, 0xF)),
            enc_inst(
                21,
                &[enc_dst(0, 0, 0xF), enc_src(1, 0, 0xE4), enc_src(2, 4, 0xE4)],
            ),
        ],
    );
    assert_eq!(
        body_of(&tokens),
        "Temporary0.x = ((dot(Un_AttrPosition0.xyzw,VConstFloat[4].xyzw)));\n\
         Temporary0.y = ((dot(Un_AttrPosition0.xyzw,VConstFloat[5].xyzw)));\n\
         Temporary0.z = ((dot(Un_AttrPosition0.xyzw,VConstFloat[6].xyzw)));\n"
    );
}

#[test]
fn saturate_appends_clamp() {
    // ps_2_0: mov_sat r0.xy, c0
    let dst = enc_dst(0, 0, 0x3) | (1 << 20);
    let tokens = shader(0xFFFF_0200, &[enc_inst(1, &[dst, enc_src(2, 0, 0xE4)])]);
    assert_eq!(
        body_of(&tokens),
        "Temporary0.rg = (PConstFloat[0].rg);\n\
         Temporary0.rg = clamp(Temporary0.rg, 0.0, 1.0);\n"
    );
}

#[test]
fn result_shift_wraps_expression() {
    // ps_2_0: mul_x2 r0, c0, c1
    let dst = enc_dst(0, 0, 0xF) | (1 << 24);
    let tokens = shader(
        0xFFFF_0200,
        &[enc_inst(5, &[dst, enc_src(2, 0, 0xE4), enc_src(2, 1, 0xE4)])],
    );
    assert_eq!(
        body_of(&tokens),
        "Temporary0 = 2.0 * (PConstFloat[0].rgba * PConstFloat[1].rgba);\n"
    );
}

#[test]
fn predicated_instruction_is_rejected() {
    let mut mov = enc_inst(
        1,
        &[enc_dst(0, 0, 0xF), enc_src(19, 0, 0x00), enc_src(2, 0, 0xE4)],
    );
    mov[0] |= 0x1000_0000;
    let tokens = shader(0xFFFE_0300, &[mov]);
    let decoded = decode_tokens(&tokens).unwrap();
    let analysis = analyze(&decoded).unwrap();
    let err = generate_body(&decoded, &analysis, &TranslateOptions::default()).unwrap_err();
    assert!(
        matches!(err, TranslateError::UnsupportedRegister { file: "p", .. }),
        "{err:?}"
    );
}

#[test]
fn if_on_defb_register_reads_the_uniform() {
    // vs_2_0: defb b1, true; if b1; endif
    let tokens = shader(
        0xFFFE_0200,
        &[
            enc_inst(47, &[enc_dst(14, 1, 0xF), 1]),
            enc_inst(40, &[enc_src(14, 1, 0xE4)]),
            enc_inst(43, &[]),
        ],
    );
    assert_eq!(body_of(&tokens), "if( VConstBool[1] )\n{\n}\n");
}

#[test]
fn partial_precision_does_not_change_output() {
    // ps_2_0: mov_pp r0, c0
    let pp = enc_dst(0, 0, 0xF) | (2 << 20);
    let tokens = shader(0xFFFF_0200, &[enc_inst(1, &[pp, enc_src(2, 0, 0xE4)])]);
    assert_eq!(body_of(&tokens), "Temporary0 = (PConstFloat[0].rgba);\n");
}
