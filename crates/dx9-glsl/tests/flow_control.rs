use dx9_glsl::{translate_vertex_shader, TranslateError, TranslateOptions};
use pretty_assertions::assert_eq;

fn version_token(major: u8, minor: u8) -> u32 {
    0xFFFE_0000 | ((major as u32) << 8) | (minor as u32)
}

fn opcode_token(op: u16, operand_count: u8) -> u32 {
    (op as u32) | (((operand_count as u32) + 1) << 24)
}

fn reg_token(regtype: u8, index: u32) -> u32 {
    let low3 = (regtype as u32) & 0x7;
    let high2 = (regtype as u32) & 0x18;
    0x8000_0000 | (low3 << 28) | (high2 << 8) | (index & 0x7FF)
}

fn dst_token(regtype: u8, index: u32, mask: u8) -> u32 {
    reg_token(regtype, index) | ((mask as u32) << 16)
}

fn src_token(regtype: u8, index: u32, swizzle: u8, srcmod: u8) -> u32 {
    reg_token(regtype, index) | ((swizzle as u32) << 16) | ((srcmod as u32) << 24)
}

const END: u32 = 0x0000_FFFF;

fn defi(register: u32, values: [i32; 4]) -> Vec<u32> {
    let mut tokens = vec![opcode_token(48, 5), dst_token(7, register, 0xF)];
    tokens.extend(values.map(|v| v as u32));
    tokens
}

/// `mov r0, cN`
fn mov_r0_c(n: u32) -> [u32; 3] {
    [
        opcode_token(1, 2),
        dst_token(0, 0, 0xF),
        src_token(2, n, 0xE4, 0),
    ]
}

fn translate(tokens: &[u32]) -> Result<String, TranslateError> {
    translate_vertex_shader(tokens, &TranslateOptions::default()).map(|shader| shader.glsl)
}

fn main_body(glsl: &str) -> &str {
    glsl.split_once("void main()\n{\n")
        .map(|(_, body)| body)
        .unwrap_or_else(|| panic!("no main in:\n{glsl}"))
}

#[test]
fn ifc_ge_opens_and_endif_closes() {
    let mut tokens = vec![
        version_token(3, 0),
        // ifc_ge c0.x, c1.x
        opcode_token(41, 2) | (3 << 16),
        src_token(2, 0, 0x00, 0),
        src_token(2, 1, 0x00, 0),
    ];
    tokens.extend(mov_r0_c(2));
    tokens.extend([opcode_token(43, 0), END]);

    let glsl = translate(&tokens).unwrap();
    assert_eq!(
        main_body(&glsl),
        "if( VConstFloat[0].x >= VConstFloat[1].x ) {\n\
         Temporary0 = (VConstFloat[2].xyzw);\n\
         }\n\
         }\n"
    );
}

#[test]
fn bool_if_else() {
    let mut tokens = vec![
        version_token(2, 0),
        // if b0
        opcode_token(40, 1),
        src_token(14, 0, 0xE4, 0),
    ];
    tokens.extend(mov_r0_c(0));
    tokens.push(opcode_token(42, 0));
    tokens.extend(mov_r0_c(1));
    tokens.extend([opcode_token(43, 0), END]);

    let glsl = translate(&tokens).unwrap();
    assert_eq!(
        main_body(&glsl),
        "if( VConstBool[0] )\n{\n\
         Temporary0 = (VConstFloat[0].xyzw);\n\
         }\nelse\n{\n\
         Temporary0 = (VConstFloat[1].xyzw);\n\
         }\n\
         }\n"
    );
}

#[test]
fn rep_with_defined_count_unrolls_to_literal_bound() {
    let mut tokens = vec![version_token(2, 0)];
    tokens.extend(defi(0, [3, 0, 0, 0]));
    tokens.extend([
        // rep i0
        opcode_token(38, 1),
        src_token(7, 0, 0xE4, 0),
        // add r0, r0, c0
        opcode_token(2, 3),
        dst_token(0, 0, 0xF),
        src_token(0, 0, 0xE4, 0),
        src_token(2, 0, 0xE4, 0),
        // endrep
        opcode_token(39, 0),
        END,
    ]);

    let glsl = translate(&tokens).unwrap();
    assert!(glsl.contains("int Loop0;\nint LoopTemp0;\n"), "{glsl}");
    assert_eq!(
        main_body(&glsl),
        "for( LoopTemp0 = 0; LoopTemp0 < 3; LoopTemp0++ ) {\n\
         Temporary0 = (Temporary0.xyzw + VConstFloat[0].xyzw);\n\
         }\n\
         }\n"
    );
}

#[test]
fn rep_with_uniform_count_reads_int_constant() {
    let tokens = [
        version_token(2, 0),
        opcode_token(38, 1),
        src_token(7, 1, 0x00, 0),
        opcode_token(39, 0),
        END,
    ];
    let glsl = translate(&tokens).unwrap();
    assert_eq!(
        main_body(&glsl),
        "for( LoopTemp0 = 0; LoopTemp0 < VConstInt[1].x; LoopTemp0++ )\n{\n}\n}\n"
    );
}

#[test]
fn loop_counter_indexes_constants() {
    let mut c0_rel = src_token(2, 0, 0xE4, 0);
    c0_rel |= 0x0000_2000;

    let mut tokens = vec![version_token(3, 0)];
    tokens.extend(defi(0, [4, 2, 1, 0]));
    tokens.extend([
        // loop aL, i0
        opcode_token(27, 2),
        src_token(15, 0, 0xE4, 0),
        src_token(7, 0, 0xE4, 0),
        // mov r0, c[aL]
        opcode_token(1, 3),
        dst_token(0, 0, 0xF),
        c0_rel,
        src_token(15, 0, 0x00, 0),
        // endloop
        opcode_token(29, 0),
        END,
    ]);

    let glsl = translate(&tokens).unwrap();
    assert_eq!(
        main_body(&glsl),
        "for( Loop0 = 2; Loop0 < ( 4 * 1 + 2 ); Loop0 += 1 ) {\n\
         Temporary0 = (VConstFloat[ Loop0 ].xyzw);\n\
         }\n\
         }\n"
    );
}

#[test]
fn loop_with_zero_step_counts_iterations_separately() {
    let mut tokens = vec![version_token(3, 0)];
    tokens.extend(defi(0, [4, 2, 0, 0]));
    tokens.extend([
        opcode_token(27, 2),
        src_token(15, 0, 0xE4, 0),
        src_token(7, 0, 0xE4, 0),
        opcode_token(29, 0),
        END,
    ]);
    let glsl = translate(&tokens).unwrap();
    assert!(glsl.contains(
        "for( Loop0 = 2, LoopTemp0 = 0; LoopTemp0 < 4; LoopTemp0++ ) {\n"
    ));
}

#[test]
fn break_and_breakc_inside_rep() {
    let mut tokens = vec![version_token(2, 1)];
    tokens.extend(defi(0, [2, 0, 0, 0]));
    tokens.extend([
        opcode_token(38, 1),
        src_token(7, 0, 0xE4, 0),
        // breakc_gt r0.x, c0.x
        opcode_token(45, 2) | (1 << 16),
        src_token(0, 0, 0x00, 0),
        src_token(2, 0, 0x00, 0),
        // break
        opcode_token(44, 0),
        opcode_token(39, 0),
        END,
    ]);
    let glsl = translate(&tokens).unwrap();
    assert_eq!(
        main_body(&glsl),
        "for( LoopTemp0 = 0; LoopTemp0 < 2; LoopTemp0++ ) {\n\
         if( Temporary0.x > VConstFloat[0].x ) break;\n\
         break;\n\
         }\n\
         }\n"
    );
}

#[test]
fn subroutines_are_forward_declared_and_appended() {
    let mut tokens = vec![
        version_token(2, 0),
        // call l0
        opcode_token(25, 1),
        src_token(18, 0, 0xE4, 0),
        // callnz l0, b1
        opcode_token(26, 2),
        src_token(18, 0, 0xE4, 0),
        src_token(14, 1, 0xE4, 0),
        // ret
        opcode_token(28, 0),
        // label l0
        opcode_token(30, 1),
        src_token(18, 0, 0xE4, 0),
    ];
    tokens.extend(mov_r0_c(0));
    tokens.extend([opcode_token(28, 0), END]);

    let glsl = translate(&tokens).unwrap();
    assert!(glsl.contains("void LabelFunction0();\n"), "{glsl}");
    assert_eq!(
        main_body(&glsl),
        "LabelFunction0();\n\
         if( VConstBool[1] ) LabelFunction0();\n\
         }\n\
         void LabelFunction0()\n{\n\
         Temporary0 = (VConstFloat[0].xyzw);\n\
         }\n"
    );
}

#[test]
fn unbalanced_blocks_are_rejected() {
    // endif with no if
    let stray_endif = [version_token(3, 0), opcode_token(43, 0), END];
    assert!(matches!(
        translate(&stray_endif),
        Err(TranslateError::InvalidControlFlow(_))
    ));

    // if b0 never closed
    let open_if = [
        version_token(3, 0),
        opcode_token(40, 1),
        src_token(14, 0, 0xE4, 0),
        END,
    ];
    assert!(matches!(
        translate(&open_if),
        Err(TranslateError::InvalidControlFlow(_))
    ));

    // endloop closing a rep
    let mismatched = [
        version_token(3, 0),
        opcode_token(38, 1),
        src_token(7, 0, 0xE4, 0),
        opcode_token(29, 0),
        END,
    ];
    assert!(matches!(
        translate(&mismatched),
        Err(TranslateError::InvalidControlFlow(_))
    ));

    // break at top level
    let stray_break = [version_token(3, 0), opcode_token(44, 0), END];
    assert!(matches!(
        translate(&stray_break),
        Err(TranslateError::InvalidControlFlow(_))
    ));
}

#[test]
fn loop_counter_outside_loop_is_rejected() {
    let mut c0_rel = src_token(2, 0, 0xE4, 0);
    c0_rel |= 0x0000_2000;
    let tokens = [
        version_token(3, 0),
        opcode_token(1, 3),
        dst_token(0, 0, 0xF),
        c0_rel,
        src_token(15, 0, 0x00, 0),
        END,
    ];
    assert!(matches!(
        translate(&tokens),
        Err(TranslateError::InvalidControlFlow(_))
    ));
}
