//! Template compiler: markup with `{{ }}` interpolations and `v-` directives in,
//! a render program over `h` / `renderList` / `withModel` out.
//!
//! ```
//! let program = velox_template::compile("<div>{{ msg }}</div>").unwrap();
//! assert_eq!(program.to_string(), "h(\"div\", null, msg)");
//! ```

pub mod context;
pub mod directives;
pub mod error;
pub mod expr;
pub mod options;
pub mod program;
pub mod runtime;
pub mod template_ast;
pub mod template_codegen;
pub mod template_parse;


use tracing::debug;

pub use error::{
    CodegenError, CompileError, EvalError, ParseError, ParseErrorKind, Position, RenderError,
};
pub use expr::{Expression, Function, Scope, Value};
pub use options::CompilerOptions;
pub use program::{
    ChildrenCall, ElementCall, ProgramBody, Prop, PropValue, RenderNode, RenderProgram, TagRef,
    TextSource,
};
pub use runtime::{Children, ModelBinding, Props, Renderer, Rendered, Tag};
pub use template_ast::{Attribute, Directive, Element, ElementKind, Node, Root, SimpleExpression};
pub use template_codegen::generate;
pub use template_parse::parse_template_to_ast;

/// Compile a template with the default options.
pub fn compile(template: &str) -> Result<RenderProgram, CompileError> {
    compile_with(template, &CompilerOptions::default())
}

pub fn compile_with(
    template: &str,
    options: &CompilerOptions,
) -> Result<RenderProgram, CompileError> {
    debug!(len = template.len(), "compile");
    let root = parse_template_to_ast(template, options)?;
    Ok(generate(&root)?)
}
