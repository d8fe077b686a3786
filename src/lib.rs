use lazy_static::lazy_static;
use regex::Regex;
use std::io;
use std::ops::Range;
use swc_core::{
    common::{
        comments::SingleThreadedComments,
        sync::Lrc,
        BytePos, FileName, SourceMap, Spanned, SyntaxContext, DUMMY_SP,
    },
    ecma::{
        ast::*,
        codegen::{text_writer::JsWriter, Config, Emitter},
        parser::{
            error::Error as ParserError, lexer::Lexer, EsSyntax, Parser, StringInput, Syntax,
            TsSyntax,
        },
        visit::{VisitMut, VisitMutWith},
    },
};
use thiserror::Error;
use tracing::debug;

// -----------------------------------------------------------------------------
// Globals
// -----------------------------------------------------------------------------

/// Comment token that opts a declaration into log injection.
pub const MARKER: &str = "#ynqq.log";
/// Prefix shared by every identifier this transform synthesizes.
pub const DATA_PREFIX: &str = "_ynqq_data_";
/// First argument of an injected return-value log.
pub const RETURN_TAG: &str = "RETURN---";
/// First-argument prefix of an injected variable-binding log.
pub const VARS_TAG: &str = "VARS---";

lazy_static! {
    static ref MARKER_RE: Regex = Regex::new(MARKER).unwrap();
    // `<script setup ...>` block of a single-file component. Non-greedy so a
    // second script block later in the document is never swallowed.
    static ref SCRIPT_SETUP_RE: Regex =
        Regex::new(r"(?s)(<script\s+setup[^>]*>)(.*?)(</script>)").unwrap();
}

// -----------------------------------------------------------------------------
// Errors
// -----------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to parse {file}:{line}:{column}: {message}")]
    Parse {
        file: String,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("no <script setup> block in {file}")]
    MissingScriptSetup { file: String },
    #[error("failed to emit rewritten module: {0}")]
    Emit(#[from] io::Error),
}

// -----------------------------------------------------------------------------
// Synthetic naming scheme
// -----------------------------------------------------------------------------

/// What an injected capture binding holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Return,
    Var,
}

impl DataKind {
    fn as_str(self) -> &'static str {
        match self {
            DataKind::Return => "return",
            DataKind::Var => "var",
        }
    }
}

/// Deterministic name for a synthetic binding of `kind`, e.g.
/// `_ynqq_data_return`.
pub fn data_ident(kind: DataKind) -> String {
    format!("{DATA_PREFIX}{}", kind.as_str())
}

fn is_data_ident(sym: &str) -> bool {
    sym.starts_with(DATA_PREFIX)
}

// -----------------------------------------------------------------------------
// Synthetic statement builders
// -----------------------------------------------------------------------------

fn ident(sym: &str) -> Ident {
    Ident::new(sym.into(), DUMMY_SP, SyntaxContext::empty())
}

// Values here are tags and identifier names, so the raw single-quoted text
// never needs escaping.
fn single_quoted(value: String) -> Expr {
    let raw = format!("'{value}'");
    Expr::Lit(Lit::Str(Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: Some(raw.into()),
    }))
}

fn console_log_stmt(args: Vec<ExprOrSpread>) -> Stmt {
    Stmt::Expr(ExprStmt {
        span: DUMMY_SP,
        expr: Box::new(Expr::Call(CallExpr {
            span: DUMMY_SP,
            callee: Callee::Expr(Box::new(Expr::Member(MemberExpr {
                span: DUMMY_SP,
                obj: Box::new(Expr::Ident(ident("console"))),
                prop: MemberProp::Ident(IdentName::new("log".into(), DUMMY_SP)),
            }))),
            args,
            type_args: None,
            ctxt: SyntaxContext::empty(),
        })),
    })
}

/// `const <name> = <init>;`
fn capture_decl(name: &str, init: Box<Expr>) -> Stmt {
    Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span: DUMMY_SP,
        kind: VarDeclKind::Const,
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name: Pat::Ident(BindingIdent {
                id: ident(name),
                type_ann: None,
            }),
            init: Some(init),
            definite: false,
        }],
        ctxt: SyntaxContext::empty(),
    })))
}

/// `console.log('RETURN---', <capture>);`
fn return_log_stmt(capture: &str) -> Stmt {
    console_log_stmt(vec![
        ExprOrSpread {
            spread: None,
            expr: Box::new(single_quoted(RETURN_TAG.to_string())),
        },
        ExprOrSpread {
            spread: None,
            expr: Box::new(Expr::Ident(ident(capture))),
        },
    ])
}

/// `console.log('VARS---<name>:', <name>);`
fn var_log_stmt(name: &str) -> Stmt {
    console_log_stmt(vec![
        ExprOrSpread {
            spread: None,
            expr: Box::new(single_quoted(format!("{VARS_TAG}{name}:"))),
        },
        ExprOrSpread {
            spread: None,
            expr: Box::new(Expr::Ident(ident(name))),
        },
    ])
}

// -----------------------------------------------------------------------------
// Statement recognizers
// -----------------------------------------------------------------------------

// `(expr)` binds the same value as `expr`, so every recognizer looks
// through parentheses.
fn unwrap_parens(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_parens(&paren.expr),
        _ => expr,
    }
}

fn unwrap_parens_mut(expr: &mut Expr) -> &mut Expr {
    match expr {
        Expr::Paren(paren) => unwrap_parens_mut(&mut paren.expr),
        _ => expr,
    }
}

fn is_function_valued(expr: &Expr) -> bool {
    matches!(unwrap_parens(expr), Expr::Arrow(_) | Expr::Fn(_))
}

/// Block body of a function-valued initializer, if it has one. Expression
/// bodied arrows have no statement list to rewrite.
fn function_block_body(init: &mut Expr) -> Option<&mut BlockStmt> {
    match unwrap_parens_mut(init) {
        Expr::Arrow(arrow) => match &mut *arrow.body {
            BlockStmtOrExpr::BlockStmt(block) => Some(block),
            BlockStmtOrExpr::Expr(_) => None,
        },
        Expr::Fn(fn_expr) => fn_expr.function.body.as_mut(),
        _ => None,
    }
}

/// Name of the binding whose value should be logged, or `None` when the
/// declaration must be left alone: function-valued initializers are handled
/// through their own bodies, synthetic captures are this transform's own
/// output, and `declare` or destructuring bindings carry no single runtime
/// name to log. Only the first declarator decides.
fn loggable_binding(var: &VarDecl) -> Option<String> {
    if var.declare {
        return None;
    }
    let first = var.decls.first()?;
    let name = first.name.as_ident()?;
    if is_data_ident(name.id.sym.as_ref()) {
        return None;
    }
    if let Some(init) = &first.init {
        if is_function_valued(init) {
            return None;
        }
    }
    Some(name.id.sym.to_string())
}

fn console_log_first_arg(stmt: &Stmt) -> Option<&Expr> {
    if let Stmt::Expr(expr_stmt) = stmt {
        if let Expr::Call(call) = &*expr_stmt.expr {
            if let Callee::Expr(callee) = &call.callee {
                if let Expr::Member(member) = &**callee {
                    if let (Expr::Ident(obj), MemberProp::Ident(prop)) =
                        (&*member.obj, &member.prop)
                    {
                        if obj.sym.as_ref() == "console" && prop.sym.as_ref() == "log" {
                            return call.args.first().map(|arg| &*arg.expr);
                        }
                    }
                }
            }
        }
    }
    None
}

/// A `console.log` whose first argument carries the variable tag.
fn is_vars_log(stmt: &Stmt) -> bool {
    match console_log_first_arg(stmt) {
        Some(Expr::Lit(Lit::Str(s))) => s.value.starts_with(VARS_TAG),
        _ => false,
    }
}

/// Statements a return rewrite leaves behind: the capture binding, the tagged
/// log call, and the rewritten `return` itself. Seeing one directly before a
/// `return` means that return has already been handled.
fn references_return_capture(stmt: &Stmt) -> bool {
    let capture = data_ident(DataKind::Return);
    match stmt {
        Stmt::Decl(Decl::Var(var)) => var.decls.iter().any(|d| {
            d.name
                .as_ident()
                .map(|name| name.id.sym.as_ref() == capture)
                .unwrap_or(false)
        }),
        Stmt::Expr(expr_stmt) => {
            if let Expr::Call(call) = &*expr_stmt.expr {
                call.args
                    .iter()
                    .any(|arg| matches!(&*arg.expr, Expr::Ident(id) if id.sym.as_ref() == capture))
            } else {
                false
            }
        }
        Stmt::Return(ret) => ret
            .arg
            .as_deref()
            .map(|arg| matches!(arg, Expr::Ident(id) if id.sym.as_ref() == capture))
            .unwrap_or(false),
        _ => false,
    }
}

// -----------------------------------------------------------------------------
// Statement injector
// -----------------------------------------------------------------------------

/// Rewrites one statement list in place, walking an explicit cursor so
/// freshly inserted statements are never revisited. Three shapes are handled:
///
///   return <expr>;         const _ynqq_data_return = <expr>;
///                          console.log('RETURN---', _ynqq_data_return);
///                          return _ynqq_data_return;
///
///   let x = <expr>;        let x = <expr>;
///                          console.log('VARS---x:', x);
///
///   if (c) { ... }         recurses into the consequent block only
///
/// Each rewrite recognizes its own output, so a list that already carries the
/// injected statements passes through unchanged. Returns the number of
/// statements inserted.
fn instrument_stmts(stmts: &mut Vec<Stmt>) -> usize {
    let capture = data_ident(DataKind::Return);
    let mut inserted = 0;
    let mut i = 0;
    while i < stmts.len() {
        match &stmts[i] {
            // Bare `return;` has no value to capture and stays as is.
            Stmt::Return(ret) if ret.arg.is_some() => {
                if i > 0 && references_return_capture(&stmts[i - 1]) {
                    i += 1;
                    continue;
                }
                if let Stmt::Return(ret) = &mut stmts[i] {
                    if let Some(arg) = &mut ret.arg {
                        // The returned expression is evaluated exactly once,
                        // in the capture binding.
                        let init =
                            std::mem::replace(arg, Box::new(Expr::Ident(ident(&capture))));
                        stmts.insert(i, return_log_stmt(&capture));
                        stmts.insert(i, capture_decl(&capture, init));
                        inserted += 2;
                    }
                }
                i += 3;
            }
            Stmt::Decl(Decl::Var(var)) => {
                match loggable_binding(var) {
                    Some(name) => {
                        let already_logged = match stmts.get(i + 1) {
                            Some(next) => is_vars_log(next),
                            None => false,
                        };
                        if already_logged {
                            i += 1;
                        } else {
                            stmts.insert(i + 1, var_log_stmt(&name));
                            inserted += 1;
                            i += 2;
                        }
                    }
                    None => i += 1,
                }
            }
            Stmt::If(_) => {
                if let Stmt::If(if_stmt) = &mut stmts[i] {
                    if let Stmt::Block(block) = &mut *if_stmt.cons {
                        inserted += instrument_stmts(&mut block.stmts);
                    }
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    inserted
}

// -----------------------------------------------------------------------------
// Marker detection
// -----------------------------------------------------------------------------

// Leading comments attach to the byte position of the token they precede.
fn has_marker(comments: &SingleThreadedComments, pos: BytePos) -> bool {
    comments.with_leading(pos, |list| {
        list.iter().any(|c| MARKER_RE.is_match(c.text.trim()))
    })
}

// -----------------------------------------------------------------------------
// Pass: eligible-node dispatch
// -----------------------------------------------------------------------------

/// Hands every marked function body to the statement injector: function
/// declarations, block-bodied arrows, and the function-valued declarators of
/// a marked variable declaration.
struct LogInjector<'a> {
    comments: &'a SingleThreadedComments,
    // Start positions of the statements and module items currently being
    // descended through. `export function f` and `const f = () => {}` attach
    // their marker comment to the enclosing statement, not the declaration.
    // Argument lists and container literals push a dummy position instead,
    // which masks the statement for everything nested inside them.
    enclosing: Vec<BytePos>,
    inserted: usize,
}

impl<'a> LogInjector<'a> {
    fn new(comments: &'a SingleThreadedComments) -> Self {
        Self {
            comments,
            enclosing: Vec::new(),
            inserted: 0,
        }
    }

    fn is_marked(&self, lo: BytePos) -> bool {
        if has_marker(self.comments, lo) {
            return true;
        }
        self.enclosing
            .last()
            .map(|pos| has_marker(self.comments, *pos))
            .unwrap_or(false)
    }

    fn instrument_block(&mut self, block: &mut BlockStmt) {
        self.inserted += instrument_stmts(&mut block.stmts);
    }
}

impl<'a> VisitMut for LogInjector<'a> {
    fn visit_mut_module_item(&mut self, item: &mut ModuleItem) {
        self.enclosing.push(item.span().lo);
        item.visit_mut_children_with(self);
        self.enclosing.pop();
    }

    fn visit_mut_stmt(&mut self, stmt: &mut Stmt) {
        self.enclosing.push(stmt.span().lo);
        stmt.visit_mut_children_with(self);
        self.enclosing.pop();
    }

    // The statement fallback stops at argument lists and container literals.
    // In `wrap(() => {})` the arrow belongs to the call, and a marker on the
    // statement does not mark it.
    fn visit_mut_call_expr(&mut self, n: &mut CallExpr) {
        n.callee.visit_mut_with(self);
        self.enclosing.push(DUMMY_SP.lo());
        n.args.visit_mut_with(self);
        self.enclosing.pop();
    }

    fn visit_mut_new_expr(&mut self, n: &mut NewExpr) {
        n.callee.visit_mut_with(self);
        self.enclosing.push(DUMMY_SP.lo());
        n.args.visit_mut_with(self);
        self.enclosing.pop();
    }

    fn visit_mut_object_lit(&mut self, n: &mut ObjectLit) {
        self.enclosing.push(DUMMY_SP.lo());
        n.visit_mut_children_with(self);
        self.enclosing.pop();
    }

    fn visit_mut_array_lit(&mut self, n: &mut ArrayLit) {
        self.enclosing.push(DUMMY_SP.lo());
        n.visit_mut_children_with(self);
        self.enclosing.pop();
    }

    fn visit_mut_jsx_expr_container(&mut self, n: &mut JSXExprContainer) {
        self.enclosing.push(DUMMY_SP.lo());
        n.visit_mut_children_with(self);
        self.enclosing.pop();
    }

    fn visit_mut_fn_decl(&mut self, n: &mut FnDecl) {
        // `declare function` has no body to instrument.
        if self.is_marked(n.function.span.lo) {
            if let Some(body) = &mut n.function.body {
                self.instrument_block(body);
            }
        }
        n.visit_mut_children_with(self);
    }

    fn visit_mut_export_default_decl(&mut self, n: &mut ExportDefaultDecl) {
        // `export default function () { ... }` is a declaration in all but
        // name.
        if let DefaultDecl::Fn(fn_expr) = &mut n.decl {
            if self.is_marked(n.span.lo) {
                if let Some(body) = &mut fn_expr.function.body {
                    self.instrument_block(body);
                }
            }
        }
        n.visit_mut_children_with(self);
    }

    fn visit_mut_var_decl(&mut self, n: &mut VarDecl) {
        if self.is_marked(n.span.lo) {
            // A single `const a = ..., b = ...` can bind several functions.
            for decl in &mut n.decls {
                if let Some(init) = &mut decl.init {
                    if let Some(body) = function_block_body(init) {
                        self.instrument_block(body);
                    }
                }
            }
        }
        n.visit_mut_children_with(self);
    }

    fn visit_mut_arrow_expr(&mut self, n: &mut ArrowExpr) {
        if self.is_marked(n.span.lo) {
            if let BlockStmtOrExpr::BlockStmt(block) = &mut *n.body {
                self.instrument_block(block);
            }
        }
        n.visit_mut_children_with(self);
    }
}

// -----------------------------------------------------------------------------
// Parse & emit plumbing
// -----------------------------------------------------------------------------

fn script_syntax(file: &str) -> Syntax {
    if file.ends_with(".ts") {
        Syntax::Typescript(TsSyntax::default())
    } else {
        Syntax::Es(EsSyntax {
            jsx: true,
            ..EsSyntax::default()
        })
    }
}

fn parse_error(cm: &SourceMap, file: &str, err: ParserError) -> TransformError {
    let span = err.span();
    // lookup_char_pos must never see a dummy position.
    let (line, column) = if span.is_dummy() {
        (0, 0)
    } else {
        let loc = cm.lookup_char_pos(span.lo());
        (loc.line, loc.col_display + 1)
    };
    TransformError::Parse {
        file: file.to_string(),
        line,
        column,
        message: err.kind().msg().to_string(),
    }
}

fn parse_file(
    source: &str,
    file: &str,
    syntax: Syntax,
) -> Result<(Module, Lrc<SourceMap>, SingleThreadedComments), TransformError> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom(file.to_string()).into(),
        source.to_string(),
    );
    let comments = SingleThreadedComments::default();
    let lexer = Lexer::new(
        syntax,
        EsVersion::latest(),
        StringInput::from(&*fm),
        Some(&comments),
    );
    let mut parser = Parser::new_from(lexer);
    let module = parser
        .parse_module()
        .map_err(|e| parse_error(&cm, file, e))?;
    // The parser recovers from some malformed input; a recovered error still
    // fails the whole file.
    if let Some(err) = parser.take_errors().into_iter().next() {
        return Err(parse_error(&cm, file, err));
    }
    Ok((module, cm, comments))
}

fn print_module(
    module: &Module,
    cm: Lrc<SourceMap>,
    comments: &SingleThreadedComments,
) -> Result<String, TransformError> {
    let mut buf = vec![];
    {
        let mut emitter = Emitter {
            cfg: Config::default(),
            cm: cm.clone(),
            // Comments ride along so the marker is still present when the
            // output is transformed again.
            comments: Some(comments),
            wr: JsWriter::new(cm.clone(), "\n", &mut buf, None),
        };
        emitter.emit_module(module)?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

// -----------------------------------------------------------------------------
// Source assembly
// -----------------------------------------------------------------------------

fn instrument_source(source: &str, file: &str, syntax: Syntax) -> Result<String, TransformError> {
    let (mut module, cm, comments) = parse_file(source, file, syntax)?;
    let mut pass = LogInjector::new(&comments);
    module.visit_mut_with(&mut pass);
    debug!(file, inserted = pass.inserted, "log injection pass finished");
    print_module(&module, cm, &comments)
}

/// Rewrites a whole script file. The text is round-tripped through the
/// parser and emitter even when nothing is marked.
pub fn transform_script(source: &str, file: &str) -> Result<String, TransformError> {
    instrument_source(source, file, script_syntax(file))
}

fn setup_block(source: &str) -> Option<(Range<usize>, &str, &str)> {
    let caps = SCRIPT_SETUP_RE.captures(source)?;
    let whole = caps.get(0)?;
    let open = caps.get(1)?;
    let inner = caps.get(2)?;
    Some((whole.range(), open.as_str(), inner.as_str()))
}

/// Rewrites the `<script setup>` block of a single-file component and
/// splices the result back, leaving every byte outside the block untouched.
pub fn transform_vue(source: &str, file: &str) -> Result<String, TransformError> {
    let (range, open, inner) =
        setup_block(source).ok_or_else(|| TransformError::MissingScriptSetup {
            file: file.to_string(),
        })?;
    let rewritten = instrument_source(inner, file, Syntax::Typescript(TsSyntax::default()))?;
    debug!(file, "splicing rewritten script block back into component");
    let mut out = String::with_capacity(source.len() + rewritten.len());
    out.push_str(&source[..range.start]);
    out.push_str(open);
    out.push('\n');
    out.push_str(&rewritten);
    if !rewritten.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("</script>");
    out.push_str(&source[range.end..]);
    Ok(out)
}

// -----------------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------------

/// Applies log injection to one file, dispatching on the file identifier's
/// suffix:
///
///   `.vue`        rewrite the `<script setup>` block in place
///   `.js` / `.ts` rewrite the whole file
///   anything else `Ok(None)`, meaning apply no transformation
pub fn transform(source: &str, file: &str) -> Result<Option<String>, TransformError> {
    if file.ends_with(".vue") {
        transform_vue(source, file).map(Some)
    } else if file.ends_with(".js") || file.ends_with(".ts") {
        transform_script(source, file).map(Some)
    } else {
        debug!(file, "file kind not handled, passing through");
        Ok(None)
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_module_src(source: &str) -> Module {
        let (module, _cm, _comments) =
            parse_file(source, "unit.ts", Syntax::Typescript(TsSyntax::default())).unwrap();
        module
    }

    fn parse_body(source: &str) -> Vec<Stmt> {
        for item in parse_module_src(source).body {
            if let ModuleItem::Stmt(Stmt::Decl(Decl::Fn(f))) = item {
                return f.function.body.expect("function body").stmts;
            }
        }
        panic!("no function declaration in test source");
    }

    fn capture_name(stmt: &Stmt) -> Option<String> {
        if let Stmt::Decl(Decl::Var(var)) = stmt {
            if let Some(name) = var.decls.first().and_then(|d| d.name.as_ident()) {
                return Some(name.id.sym.to_string());
            }
        }
        None
    }

    #[test]
    fn synthetic_names_share_the_prefix() {
        assert_eq!(data_ident(DataKind::Return), "_ynqq_data_return");
        assert_eq!(data_ident(DataKind::Var), "_ynqq_data_var");
        assert!(is_data_ident("_ynqq_data_return"));
        assert!(is_data_ident("_ynqq_data_var"));
        assert!(!is_data_ident("total"));
    }

    #[test]
    fn marker_matches_anywhere_in_the_comment_text() {
        assert!(MARKER_RE.is_match("#ynqq.log"));
        assert!(MARKER_RE.is_match("note #ynqq.log note"));
        assert!(!MARKER_RE.is_match("#ynqq"));
    }

    #[test]
    fn empty_list_passes_through() {
        let mut stmts = vec![];
        assert_eq!(instrument_stmts(&mut stmts), 0);
        assert!(stmts.is_empty());
    }

    #[test]
    fn return_rewrite_is_capture_log_return() {
        let mut stmts = parse_body("function f() { return 1; }");
        assert_eq!(instrument_stmts(&mut stmts), 2);
        assert_eq!(stmts.len(), 3);
        assert_eq!(capture_name(&stmts[0]).as_deref(), Some("_ynqq_data_return"));
        match console_log_first_arg(&stmts[1]) {
            Some(Expr::Lit(Lit::Str(s))) => assert_eq!(s.value.as_ref(), RETURN_TAG),
            other => panic!("expected return log, got {other:?}"),
        }
        match &stmts[2] {
            Stmt::Return(ret) => match ret.arg.as_deref() {
                Some(Expr::Ident(id)) => assert_eq!(id.sym.as_ref(), "_ynqq_data_return"),
                other => panic!("expected capture identifier, got {other:?}"),
            },
            other => panic!("expected return statement, got {other:?}"),
        }
    }

    #[test]
    fn binding_log_lands_after_the_declaration() {
        let mut stmts = parse_body("function f() { const x = 1; }");
        assert_eq!(instrument_stmts(&mut stmts), 1);
        assert_eq!(stmts.len(), 2);
        assert!(is_vars_log(&stmts[1]));
        match console_log_first_arg(&stmts[1]) {
            Some(Expr::Lit(Lit::Str(s))) => assert_eq!(s.value.as_ref(), "VARS---x:"),
            other => panic!("expected vars log, got {other:?}"),
        }
    }

    #[test]
    fn initializer_less_binding_is_still_logged() {
        let mut stmts = parse_body("function f() { let pending; }");
        assert_eq!(instrument_stmts(&mut stmts), 1);
        assert_eq!(stmts.len(), 2);
        assert!(is_vars_log(&stmts[1]));
    }

    #[test]
    fn bare_return_is_untouched() {
        let mut stmts = parse_body("function f() { return; }");
        assert_eq!(instrument_stmts(&mut stmts), 0);
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn function_valued_first_declarator_skips_the_statement() {
        let mut stmts = parse_body("function f() { const g = () => { return 1; }, h = 2; }");
        assert_eq!(instrument_stmts(&mut stmts), 0);
        assert_eq!(stmts.len(), 1);

        let mut stmts = parse_body("function f() { const g = function () { return 1; }; }");
        assert_eq!(instrument_stmts(&mut stmts), 0);
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn paren_wrapped_function_initializer_skips_the_statement() {
        let mut stmts = parse_body("function f() { const g = (() => { return 1; }); }");
        assert_eq!(instrument_stmts(&mut stmts), 0);
        assert_eq!(stmts.len(), 1);

        let mut stmts = parse_body("function f() { const g = (function () { return 1; }); }");
        assert_eq!(instrument_stmts(&mut stmts), 0);
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn declare_and_destructured_bindings_are_skipped() {
        for item in parse_module_src("declare const x: number;").body {
            if let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = item {
                assert_eq!(loggable_binding(&var), None);
                return;
            }
        }
        panic!("no variable declaration in test source");
    }

    #[test]
    fn destructuring_binding_gets_no_log() {
        let mut stmts = parse_body("function f(src: any) { const { a } = src; }");
        assert_eq!(instrument_stmts(&mut stmts), 0);
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn instrumented_body_is_left_alone() {
        let mut stmts = parse_body(
            "function f() {
                const x = 1;
                console.log('VARS---x:', x);
                const _ynqq_data_return = x;
                console.log('RETURN---', _ynqq_data_return);
                return _ynqq_data_return;
            }",
        );
        assert_eq!(stmts.len(), 5);
        assert_eq!(instrument_stmts(&mut stmts), 0);
        assert_eq!(stmts.len(), 5);
    }

    #[test]
    fn single_statement_consequent_is_not_entered() {
        let mut stmts = parse_body("function f(c: boolean) { if (c) return 1; return 2; }");
        assert_eq!(instrument_stmts(&mut stmts), 2);
        assert_eq!(stmts.len(), 4);
        match &stmts[0] {
            Stmt::If(if_stmt) => {
                assert!(matches!(&*if_stmt.cons, Stmt::Return(ret) if ret.arg.is_some()));
            }
            other => panic!("expected if statement, got {other:?}"),
        }
    }

    #[test]
    fn consequent_block_is_instrumented() {
        let mut stmts = parse_body(
            "function f(c: number) {
                if (c) {
                    const y = c * 2;
                    return y;
                }
            }",
        );
        assert_eq!(instrument_stmts(&mut stmts), 3);
        assert_eq!(stmts.len(), 1);
        match &stmts[0] {
            Stmt::If(if_stmt) => match &*if_stmt.cons {
                Stmt::Block(block) => assert_eq!(block.stmts.len(), 5),
                other => panic!("expected block consequent, got {other:?}"),
            },
            other => panic!("expected if statement, got {other:?}"),
        }
    }
}
