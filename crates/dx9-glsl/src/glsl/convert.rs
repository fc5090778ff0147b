//! Per-instruction conversion functions.
//!
//! Each function appends the GLSL for one decoded instruction. Arithmetic converters follow the
//! same shape: `DEST MASK = SHIFT(` from [`ConversionState::write_destination`], then the
//! expression, then `);`.

use std::fmt::Write as _;

use crate::analysis::ShaderAnalysis;
use crate::error::TranslateError;
use crate::glsl::body::{Block, Emitter};
use crate::glsl::names::{result_shift_prefix, Namer};
use crate::options::TranslateOptions;
use crate::sm::decode::DecodedInstruction;
use crate::sm::opcode::Opcode;
use crate::sm::token::{
    opcode_control, CompareOp, Param, RegisterFile, TextureType, WriteMask, TEXLD_BIAS,
    TEXLD_PROJECT,
};
use crate::sm::types::ShaderStage;

pub type ConvertFn = fn(&mut ConversionState<'_>) -> Result<(), TranslateError>;

/// Everything a conversion function can see while translating one instruction.
pub struct ConversionState<'a> {
    pub analysis: &'a ShaderAnalysis,
    pub options: &'a TranslateOptions,
    pub instruction: &'a DecodedInstruction,
    pub(crate) emitter: &'a mut Emitter,
}

impl<'a> ConversionState<'a> {
    pub fn stage(&self) -> ShaderStage {
        self.analysis.version.stage
    }

    pub fn opcode(&self) -> Opcode {
        self.instruction.opcode()
    }

    fn mnemonic(&self) -> &'static str {
        self.instruction.mnemonic()
    }

    pub fn namer(&self) -> Namer<'a> {
        Namer {
            analysis: self.analysis,
            options: self.options,
            loop_register: self.emitter.innermost_loop(),
        }
    }

    pub fn out(&mut self) -> &mut String {
        self.emitter.out()
    }

    /// The destination parameter. Operand index 0 in errors.
    pub fn dest(&self) -> Result<Param, TranslateError> {
        self.instruction
            .dest()
            .copied()
            .ok_or(TranslateError::MissingOperand {
                mnemonic: self.mnemonic(),
                index: 0,
            })
    }

    /// Source parameter `index`. Operand `index + 1` in errors.
    pub fn src(&self, index: usize) -> Result<Param, TranslateError> {
        self.instruction
            .sources()
            .get(index)
            .copied()
            .ok_or(TranslateError::MissingOperand {
                mnemonic: self.mnemonic(),
                index: index + 1,
            })
    }

    pub fn source(&self, index: usize, mask: WriteMask) -> Result<String, TranslateError> {
        let param = self.src(index)?;
        self.namer().source(&param, mask)
    }

    /// Writes `DEST MASK = SHIFT(` for `param` and returns the components it writes.
    pub fn write_destination(&mut self, param: &Param) -> Result<WriteMask, TranslateError> {
        let name = self.namer().dest(param)?;
        if name.mask.is_empty() {
            return Err(TranslateError::InvalidWriteMask {
                mnemonic: self.mnemonic(),
                mask: 0,
            });
        }
        let shift = result_shift_prefix(param);
        write!(
            self.out(),
            "{}{} = {}(",
            name.register,
            name.mask_suffix,
            shift
        )?;
        Ok(name.mask)
    }

    fn write_dest_operand(&mut self) -> Result<WriteMask, TranslateError> {
        let dest = self.dest()?;
        self.write_destination(&dest)
    }

    fn dest_mask_suffix(&self) -> Result<String, TranslateError> {
        Ok(self.namer().write_mask(&self.dest()?).1)
    }
}

/// `vecN` when more than one component is written, otherwise nothing (GLSL needs an explicit
/// broadcast of scalar results).
fn broadcast(mask: WriteMask) -> String {
    match mask.component_count() {
        0 | 1 => String::new(),
        n => format!("vec{n}"),
    }
}

pub fn unimplemented(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    Err(TranslateError::UnimplementedConversion {
        mnemonic: state.mnemonic(),
    })
}

pub fn mov(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let mask = state.write_dest_operand()?;
    let src = state.source(0, mask)?;
    if state.opcode() == Opcode::Mova {
        let n = mask.component_count();
        if n > 1 {
            writeln!(
                state.out(),
                "ivec{n}( floor(abs({src})+vec{n}(0.5)) * sign({src})));"
            )?;
        } else {
            writeln!(state.out(), "int( floor(abs({src})+0.5) * sign({src})));")?;
        }
    } else {
        writeln!(state.out(), "{src});")?;
    }
    Ok(())
}

pub fn math(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let op = match state.opcode() {
        Opcode::Add => '+',
        Opcode::Sub => '-',
        Opcode::Mul => '*',
        _ => return unimplemented(state),
    };
    let mask = state.write_dest_operand()?;
    let a = state.source(0, mask)?;
    let b = state.source(1, mask)?;
    writeln!(state.out(), "{a} {op} {b});")?;
    Ok(())
}

fn emit_dot(
    state: &mut ConversionState<'_>,
    dest: &Param,
    a: &Param,
    b: &Param,
    source_mask: WriteMask,
) -> Result<(), TranslateError> {
    let mask = state.write_destination(dest)?;
    let namer = state.namer();
    let a = namer.source(a, source_mask)?;
    let b = namer.source(b, source_mask)?;
    let vec = broadcast(mask);
    writeln!(state.out(), "{vec}(dot({a},{b})));")?;
    Ok(())
}

fn dot_source_mask(opcode: Opcode) -> WriteMask {
    match opcode {
        Opcode::Dp4 | Opcode::M4x4 | Opcode::M4x3 => WriteMask::XYZW,
        _ => WriteMask::XYZ,
    }
}

pub fn dot(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let dest = state.dest()?;
    let (a, b) = (state.src(0)?, state.src(1)?);
    emit_dot(state, &dest, &a, &b, dot_source_mask(state.opcode()))
}

/// `mNxM`: one dot product per destination row against consecutive matrix registers.
pub fn matmul(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let rows = match state.opcode() {
        Opcode::M4x4 | Opcode::M3x4 => 4,
        Opcode::M4x3 | Opcode::M3x3 => 3,
        Opcode::M3x2 => 2,
        _ => return unimplemented(state),
    };
    let source_mask = dot_source_mask(state.opcode());
    let dest = state.dest()?;
    let (vector, matrix) = (state.src(0)?, state.src(1)?);
    for row in 0..rows {
        let row_dest = dest.with_write_mask(WriteMask::component(row));
        let row_matrix = matrix.with_register_offset(row as u32);
        emit_dot(state, &row_dest, &vector, &row_matrix, source_mask)?;
    }
    Ok(())
}

/// Instructions with a same-named (or near enough) GLSL builtin.
pub fn map_to_builtin(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let function = match state.opcode() {
        Opcode::Min => "min",
        Opcode::Max => "max",
        Opcode::Abs => "abs",
        Opcode::Frc => "fract",
        Opcode::Nrm => "normalize",
        Opcode::LogP | Opcode::Log => "log2",
        Opcode::Exp => "exp2",
        Opcode::Sgn => "sign",
        Opcode::Dsx => "dFdx",
        Opcode::Dsy => "dFdy",
        _ => return unimplemented(state),
    };
    let mask = state.write_dest_operand()?;
    let args = (0..state.instruction.sources().len())
        .map(|i| state.source(i, mask))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");
    writeln!(state.out(), "{function}({args}));")?;
    Ok(())
}

pub fn compare(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let mask = state.write_dest_operand()?;
    let a = state.source(0, mask)?;
    let b = state.source(1, mask)?;
    let n = mask.component_count();
    match (state.opcode(), n > 1) {
        (Opcode::Slt, true) => writeln!(state.out(), "vec{n}(lessThan({a}, {b})));")?,
        (Opcode::Sge, true) => writeln!(state.out(), "vec{n}(greaterThanEqual({a}, {b})));")?,
        (Opcode::Slt, false) => writeln!(state.out(), "({a} < {b})?1.0:0.0);")?,
        (Opcode::Sge, false) => writeln!(state.out(), "step({b}, {a}));")?,
        _ => return unimplemented(state),
    }
    Ok(())
}

pub fn mad(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let mask = state.write_dest_operand()?;
    let a = state.source(0, mask)?;
    let b = state.source(1, mask)?;
    let c = state.source(2, mask)?;
    writeln!(state.out(), "({a} * {b}) + {c});")?;
    Ok(())
}

pub fn rcp(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let mask = state.write_dest_operand()?;
    let src = state.source(0, mask)?;
    let vec = broadcast(mask);
    writeln!(state.out(), "{vec}( 1.0 / {src} ) );")?;
    Ok(())
}

pub fn rsq(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let mask = state.write_dest_operand()?;
    let src = state.source(0, WriteMask::W)?;
    let vec = broadcast(mask);
    writeln!(state.out(), "{vec}( inversesqrt( {src} ) ) );")?;
    Ok(())
}

pub fn expp(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let src = state.source(0, WriteMask::X)?;
    let mask = state.write_dest_operand()?;
    let vec = broadcast(mask);
    writeln!(state.out(), "{vec}( exp2( {src} ) ) );")?;
    Ok(())
}

/// Pixel shader `log`: the full-precision log of |x|.
pub fn log(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let mask = state.write_dest_operand()?;
    let src = state.source(0, WriteMask::X)?;
    let vec = broadcast(mask);
    writeln!(state.out(), "{vec}( log2( abs( {src} ) ) ) );")?;
    Ok(())
}

pub fn pow(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let mask = state.write_dest_operand()?;
    let base = state.source(0, WriteMask::X)?;
    let exponent = state.source(1, WriteMask::X)?;
    let vec = broadcast(mask);
    writeln!(state.out(), "{vec}( pow( abs( {base} ), {exponent} ) ) );")?;
    Ok(())
}

pub fn lit(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    state.write_dest_operand()?;
    let suffix = state.dest_mask_suffix()?;
    let x = state.source(0, WriteMask::X)?;
    let y = state.source(0, WriteMask::Y)?;
    let w = state.source(0, WriteMask::W)?;
    writeln!(
        state.out(),
        "vec4( 1.0, max( {x}, 0.0 ), pow( max( {y}, 0.0 ) * step( 0.0, {x} ), clamp( {w}, -128.0, 128.0 ) ), 1.0 ){suffix} );"
    )?;
    Ok(())
}

pub fn dst(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    state.write_dest_operand()?;
    let suffix = state.dest_mask_suffix()?;
    let a_y = state.source(0, WriteMask::Y)?;
    let a_z = state.source(0, WriteMask::Z)?;
    let b_y = state.source(1, WriteMask::Y)?;
    let b_w = state.source(1, WriteMask::W)?;
    writeln!(
        state.out(),
        "vec4( 1.0, {a_y} * {b_y}, {a_z}, {b_w} ) ){suffix};"
    )?;
    Ok(())
}

pub fn lrp(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let mask = state.write_dest_operand()?;
    let factor = state.source(0, mask)?;
    let a = state.source(1, mask)?;
    let b = state.source(2, mask)?;
    writeln!(state.out(), " mix({b}, {a}, {factor}) );")?;
    Ok(())
}

pub fn cross(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let suffix = state.dest_mask_suffix()?;
    state.write_dest_operand()?;
    let a = state.source(0, WriteMask::XYZ)?;
    let b = state.source(1, WriteMask::XYZ)?;
    writeln!(state.out(), "cross({a}, {b}){suffix} );")?;
    Ok(())
}

/// Writes cos to x and sin to y; z and w are left untouched.
pub fn sincos(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let dest = state.dest()?;
    let (mask, _) = state.namer().write_mask(&dest);
    if mask != WriteMask::X && mask != WriteMask::Y && mask != WriteMask::XY {
        return Err(TranslateError::InvalidWriteMask {
            mnemonic: state.mnemonic(),
            mask: mask.bits(),
        });
    }
    state.write_destination(&dest)?;
    let src = state.source(0, WriteMask::X)?;
    if mask == WriteMask::X {
        writeln!(state.out(), "cos({src}));")?;
    } else if mask == WriteMask::Y {
        writeln!(state.out(), "sin({src}));")?;
    } else {
        writeln!(state.out(), "vec2(cos({src}),sin({src})));")?;
    }
    Ok(())
}

/// `cmp dest, src0, src1, src2`: per component, `src0 >= 0 ? src1 : src2`.
///
/// Components are grouped by the `src0` channel they compare so each group is one ternary.
/// When any source aliases the destination, groups are assembled in `InstrHelpTemp` and copied
/// out at the end so earlier groups don't clobber inputs of later ones.
pub fn cmp(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let dest = state.dest()?;
    let sources = [state.src(0)?, state.src(1)?, state.src(2)?];
    let use_temp = sources.iter().any(|src| src.aliases(&dest));
    let selector = sources[0].swizzle();

    for channel in 0..4 {
        let mut group = WriteMask::empty();
        let mut compare_channel = WriteMask::empty();
        for component in 0..4 {
            if selector.component(component) == channel {
                compare_channel = WriteMask::component(component);
                group |= compare_channel;
            }
        }

        let restricted = dest.with_write_mask(dest.write_mask() & group);
        let (mask, suffix) = state.namer().write_mask(&restricted);
        if mask.is_empty() {
            continue;
        }
        if use_temp {
            write!(state.out(), "InstrHelpTemp{suffix} = ( ")?;
        } else {
            state.write_destination(&restricted)?;
        }

        let namer = state.namer();
        let condition = namer.source(&sources[0], compare_channel)?;
        let if_true = namer.source(&sources[1], mask)?;
        let if_false = namer.source(&sources[2], mask)?;
        writeln!(
            state.out(),
            "( {condition} >= 0.0 ) ? {if_true} : {if_false} );"
        )?;
    }

    if use_temp {
        state.write_destination(&dest)?;
        let suffix = state.dest_mask_suffix()?;
        writeln!(state.out(), "InstrHelpTemp{suffix} );")?;
    }
    Ok(())
}

pub fn dp2add(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let a = state.source(0, WriteMask::XY)?;
    let b = state.source(1, WriteMask::XY)?;
    let c = state.source(2, WriteMask::X)?;
    let mask = state.write_dest_operand()?;
    match mask.component_count() {
        1 => writeln!(state.out(), "dot( {a}, {b} ) + {c} );")?,
        n => writeln!(state.out(), "vec{n}( dot( {a}, {b} ) + {c} ) );")?,
    }
    Ok(())
}

/// Literal int constant backing `param`, if it is an `i#` register defined by `defi`.
fn known_int_constant(state: &ConversionState<'_>, param: &Param) -> Option<[i32; 4]> {
    let version = state.analysis.version;
    if param.file(version.stage, version.major) != RegisterFile::ConstInt {
        return None;
    }
    state.analysis.constants.int(param.number())
}

pub fn rep(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let count = state.src(0)?;
    let depth = state.emitter.loop_depth();
    match known_int_constant(state, &count) {
        Some([iterations, ..]) => writeln!(
            state.out(),
            "for( LoopTemp{depth} = 0; LoopTemp{depth} < {iterations}; LoopTemp{depth}++ ) {{"
        )?,
        None => {
            let iterations = state.source(0, WriteMask::X)?;
            write!(
                state.out(),
                "for( LoopTemp{depth} = 0; LoopTemp{depth} < {iterations}; LoopTemp{depth}++ )\n{{\n"
            )?;
        }
    }
    state.emitter.open(Block::Rep);
    Ok(())
}

/// `loop aL, iN`: `iN.x` iterations, `aL` starting at `iN.y` and stepping by `iN.z`.
pub fn loop_block(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let control = state.src(1)?;
    let depth = state.emitter.loop_depth();
    match known_int_constant(state, &control) {
        Some([count, start, 0, _]) => writeln!(
            state.out(),
            "for( Loop{depth} = {start}, LoopTemp{depth} = 0; LoopTemp{depth} < {count}; LoopTemp{depth}++ ) {{"
        )?,
        Some([count, start, step, _]) => {
            let op = if step > 0 { '<' } else { '>' };
            writeln!(
                state.out(),
                "for( Loop{depth} = {start}; Loop{depth} {op} ( {count} * {step} + {start} ); Loop{depth} += {step} ) {{"
            )?;
        }
        None => {
            let c = state.source(1, WriteMask::XYZW)?;
            writeln!(
                state.out(),
                "for( LoopTemp{depth} = 0, Loop{depth} = {c}.y; LoopTemp{depth} < {c}.x; LoopTemp{depth}++, Loop{depth} += {c}.z ) {{"
            )?;
        }
    }
    state.emitter.open(Block::Loop { register: depth });
    Ok(())
}

/// `endif`, `endloop` and `endrep`.
pub fn end(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let (expected, message) = match state.opcode() {
        Opcode::EndIf => (Block::If, "endif without matching if"),
        Opcode::EndRep => (Block::Rep, "endrep without matching rep"),
        _ => (Block::Loop { register: 0 }, "endloop without matching loop"),
    };
    state.emitter.close(expected, message)?;
    state.out().push_str("}\n");
    Ok(())
}

pub fn if_bool(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let condition = state.source(0, WriteMask::X)?;
    write!(state.out(), "if( {condition} )\n{{\n")?;
    state.emitter.open(Block::If);
    Ok(())
}

pub fn else_block(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    if state.emitter.innermost_block() != Some(Block::If) {
        return Err(TranslateError::InvalidControlFlow(
            "else without matching if",
        ));
    }
    state.out().push_str("}\nelse\n{\n");
    Ok(())
}

fn comparison(state: &ConversionState<'_>) -> Result<String, TranslateError> {
    let control = opcode_control(state.instruction.token);
    let op = CompareOp::from_control(control)
        .ok_or(TranslateError::UnsupportedCompareOp { control })?;
    let a = state.source(0, WriteMask::X)?;
    let b = state.source(1, WriteMask::X)?;
    Ok(format!("{a} {} {b}", op.glsl_operator()))
}

pub fn ifc(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let condition = comparison(state)?;
    writeln!(state.out(), "if( {condition} ) {{")?;
    state.emitter.open(Block::If);
    Ok(())
}

pub fn breakc(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    if state.emitter.loop_depth() == 0 {
        return Err(TranslateError::InvalidControlFlow("breakc outside of a loop"));
    }
    let condition = comparison(state)?;
    writeln!(state.out(), "if( {condition} ) break;")?;
    Ok(())
}

pub fn break_loop(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    if state.emitter.loop_depth() == 0 {
        return Err(TranslateError::InvalidControlFlow("break outside of a loop"));
    }
    state.out().push_str("break;\n");
    Ok(())
}

/// `call lN` and `callnz lN, bM`.
pub fn call(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let label = state.src(0)?.number();
    if state.opcode() == Opcode::CallNz {
        let condition = state.source(1, WriteMask::X)?;
        writeln!(state.out(), "if( {condition} ) LabelFunction{label}();")?;
    } else {
        writeln!(state.out(), "LabelFunction{label}();")?;
    }
    Ok(())
}

pub fn label(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let label = state.src(0)?.number();
    state.emitter.begin_subroutine(label)
}

/// `ret` closing a subroutine body. A `ret` in `main` never reaches here.
pub fn ret(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    state.emitter.end_subroutine()
}

/// ps_1_x `texcoord tN` / ps_1_4 `texcrd rN, tM`: the interpolated coordinate clamped to [0, 1].
pub fn texcoord(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let set = match state.instruction.sources().first() {
        Some(src) => src.number(),
        None => state.dest()?.number(),
    };
    state.write_dest_operand()?;
    let suffix = state.dest_mask_suffix()?;
    writeln!(
        state.out(),
        "clamp( gl_TexCoord[{set}], 0.0, 1.0 ){suffix} );"
    )?;
    Ok(())
}

fn texreg2(state: &mut ConversionState<'_>, components: &str) -> Result<(), TranslateError> {
    let sampler = state.dest()?.number();
    let suffix = state.dest_mask_suffix()?;
    state.write_dest_operand()?;
    let src = state.source(0, WriteMask::XYZW)?;
    writeln!(
        state.out(),
        "texture2D( PSampler{sampler}, {src}.{components} ){suffix} );"
    )?;
    Ok(())
}

pub fn texreg2ar(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    texreg2(state, "wx")
}

pub fn texreg2gb(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    texreg2(state, "yz")
}

pub fn texkill(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let dest = state.dest()?;
    let register = state.namer().register(&dest)?;
    let components = if state.analysis.version.major >= 2 {
        "xyzw"
    } else {
        "xyz"
    };
    writeln!(
        state.out(),
        "if( any( lessThan( {register}.{components}, vec4(0.0) ) ) ) discard;"
    )?;
    Ok(())
}

/// GLSL 1.20 sampling function for a sampler type and the coordinate components it consumes.
fn sample_function(texture_type: TextureType, projected: bool) -> (&'static str, WriteMask) {
    match (texture_type, projected) {
        (TextureType::Texture1D, false) => ("texture1D", WriteMask::X),
        (TextureType::Texture1D, true) => ("texture1DProj", WriteMask::X),
        (TextureType::Texture2D, false) => ("texture2D", WriteMask::XY),
        (TextureType::Texture2D, true) => ("texture2DProj", WriteMask::XY),
        (TextureType::Cube, _) => ("textureCube", WriteMask::XYZ),
        (TextureType::Volume, false) => ("texture3D", WriteMask::XYZ),
        (TextureType::Volume, true) => ("texture3DProj", WriteMask::XYZ),
    }
}

fn sampler_type(state: &ConversionState<'_>, sampler: u32) -> Result<TextureType, TranslateError> {
    let samplers = &state.analysis.usage.samplers;
    match samplers.get(sampler as usize) {
        Some(Some(texture_type)) => Ok(*texture_type),
        Some(None) => Err(TranslateError::UnsupportedSamplerType { sampler, raw: 0 }),
        None => Err(TranslateError::RegisterIndexOutOfRange {
            file: "s",
            index: sampler,
            max: samplers.len() as u32 - 1,
        }),
    }
}

/// Sampler read by a texture instruction, where the format check applies.
///
/// From ps_2_0 on `texld` names its sampler as the second source. Before that the destination
/// register number selects the sampler.
pub(crate) fn sampled_sampler(instruction: &DecodedInstruction) -> Option<u32> {
    match instruction.opcode() {
        Opcode::Tex => match instruction.sources() {
            [_, sampler] => Some(sampler.number()),
            _ => instruction.dest().map(Param::number),
        },
        Opcode::TexReg2Ar | Opcode::TexReg2Gb => instruction.dest().map(Param::number),
        _ => None,
    }
}

/// `tex`, `texld`, `texldp` and `texldb`.
pub fn tex(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let dest = state.dest()?;
    let sources = state.instruction.sources();
    let (sampler, coords, result_swizzle) = match sources {
        // texld dest, coords, sN
        [coords, sampler] => (sampler.number(), *coords, *sampler),
        // ps_1_4 texld rN, tM
        [coords] => (dest.number(), *coords, dest.as_source()),
        // ps_1_x tex tN
        _ => (dest.number(), dest.as_source(), dest.as_source()),
    };

    let token = state.instruction.token;
    let projected = token & TEXLD_PROJECT != 0;
    let (function, mut coord_mask) = sample_function(sampler_type(state, sampler)?, projected);
    if projected {
        coord_mask |= WriteMask::W;
    }

    let namer = state.namer();
    let swizzle = namer.swizzle(&result_swizzle, dest.write_mask());
    let coord = namer.source(&coords, coord_mask)?;
    let prefix = state.stage().uniform_prefix();

    state.write_destination(&dest)?;
    if token & TEXLD_BIAS != 0 {
        let bias = namer.source(&coords, WriteMask::W)?;
        writeln!(
            state.out(),
            "{function}( {prefix}Sampler{sampler}, {coord}, {bias} ){swizzle} );"
        )?;
    } else {
        writeln!(
            state.out(),
            "{function}( {prefix}Sampler{sampler}, {coord} ){swizzle} );"
        )?;
    }
    Ok(())
}

/// `texldl`: explicit level of detail taken from the coordinate's w component.
pub fn texldl(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let dest = state.dest()?;
    let sampler_param = state.src(1)?;
    let sampler = sampler_param.number();
    let (function, coord_mask) = sample_function(sampler_type(state, sampler)?, false);

    let namer = state.namer();
    let swizzle = namer.swizzle(&sampler_param, dest.write_mask());
    let coord = state.source(0, coord_mask)?;
    let lod = state.source(0, WriteMask::W)?;
    let prefix = state.stage().uniform_prefix();

    state.write_destination(&dest)?;
    writeln!(
        state.out(),
        "{function}Lod( {prefix}Sampler{sampler}, {coord}, {lod} ){swizzle} );"
    )?;
    Ok(())
}

/// `texldd`: explicit screen-space gradients.
pub fn texldd(state: &mut ConversionState<'_>) -> Result<(), TranslateError> {
    let sampler = state.src(1)?.number();
    let suffix = state.dest_mask_suffix()?;
    state.write_dest_operand()?;
    let coord = state.source(0, WriteMask::XY)?;
    let ddx = state.source(2, WriteMask::XY)?;
    let ddy = state.source(3, WriteMask::XY)?;
    writeln!(
        state.out(),
        "textureGrad( PSampler{sampler}, {coord}, {ddx}, {ddy} ){suffix} );"
    )?;
    Ok(())
}
