//! Scope & binding resolution.
//!
//! One read-only walk over the program records every declared name into the
//! lexical scope that owns it and every identifier reference together with
//! the scope it appears in. References are resolved after the walk, once all
//! hoisted declarations are known, by looking the name up in the reference's
//! scope and then in each ancestor (innermost declaration wins).
//!
//! Names that resolve nowhere (globals, ambient names) are kept as unresolved
//! references and never attached to a binding.

use oxc_ast::ast::{
    BindingIdentifier, Class, ClassType, Function, FunctionType, IdentifierReference,
    ImportDeclaration, Program, VariableDeclaration, VariableDeclarationKind,
};
use oxc_ast_visit::{walk, Visit};
use oxc_span::Span;
use oxc_syntax::scope::{ScopeFlags, ScopeId};
use std::cell::Cell;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LexicalScopeId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Import,
    Var,
    /// let/const, parameters, catch parameters, type-level names
    Lexical,
    Function,
    Class,
}

/// One declared name and the places that read it.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub kind: BindingKind,
    pub scope: LexicalScopeId,
    pub declared_at: Span,
    /// Source-ordered reference sites.
    pub references: Vec<Span>,
}

impl Binding {
    pub fn is_referenced(&self) -> bool {
        !self.references.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    /// Lookup fallthrough only; the tree owns every scope.
    pub parent: Option<LexicalScopeId>,
    pub flags: ScopeFlags,
    bindings: HashMap<String, BindingId>,
}

impl Scope {
    fn new(parent: Option<LexicalScopeId>, flags: ScopeFlags) -> Self {
        Self {
            parent,
            flags,
            bindings: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<BindingId> {
        self.bindings.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Scopes that receive hoisted `var` declarations.
    fn is_var_scope(&self) -> bool {
        self.flags.intersects(
            ScopeFlags::Top
                | ScopeFlags::Function
                | ScopeFlags::Arrow
                | ScopeFlags::ClassStaticBlock
                | ScopeFlags::TsModuleBlock,
        )
    }
}

#[derive(Debug, Clone)]
pub struct UnresolvedReference {
    pub name: String,
    pub span: Span,
}

/// Every scope of one program, rooted at the module scope.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    bindings: Vec<Binding>,
    unresolved: Vec<UnresolvedReference>,
}

impl ScopeTree {
    const MODULE: LexicalScopeId = LexicalScopeId(0);

    /// Walk `program` once and resolve all of its references.
    pub fn build(program: &Program<'_>) -> Self {
        let mut resolver = Resolver::new();
        resolver.visit_program(program);
        resolver.finish()
    }

    fn empty() -> Self {
        Self {
            scopes: vec![Scope::new(None, ScopeFlags::Top)],
            bindings: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    pub fn module_scope(&self) -> LexicalScopeId {
        Self::MODULE
    }

    pub fn scope(&self, id: LexicalScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.0 as usize]
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Binding declared directly in the module scope under `name`.
    pub fn module_binding(&self, name: &str) -> Option<&Binding> {
        self.scope(Self::MODULE)
            .get(name)
            .map(|id| self.binding(id))
    }

    /// Resolve `name` from `scope` outward.
    pub fn lookup(&self, scope: LexicalScopeId, name: &str) -> Option<BindingId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(binding) = scope.get(name) {
                return Some(binding);
            }
            current = scope.parent;
        }
        None
    }

    pub fn unresolved_references(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    fn push_scope(&mut self, parent: LexicalScopeId, flags: ScopeFlags) -> LexicalScopeId {
        let id = LexicalScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(Some(parent), flags));
        id
    }

    /// Redeclaring a name in the same scope keeps the first binding.
    fn declare(&mut self, scope: LexicalScopeId, name: &str, kind: BindingKind, span: Span) {
        if self.scope(scope).get(name).is_some() {
            return;
        }
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(Binding {
            name: name.to_string(),
            kind,
            scope,
            declared_at: span,
            references: Vec::new(),
        });
        self.scopes[scope.0 as usize]
            .bindings
            .insert(name.to_string(), id);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLVER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclarationContext {
    Lexical,
    Var,
    Import,
}

struct PendingReference {
    name: String,
    scope: LexicalScopeId,
    span: Span,
}

struct Resolver {
    tree: ScopeTree,
    stack: Vec<(LexicalScopeId, DeclarationContext)>,
    context: DeclarationContext,
    /// Function/class names are declared by their own visitor.
    skip_binding: Option<Span>,
    pending: Vec<PendingReference>,
}

impl Resolver {
    fn new() -> Self {
        Self {
            tree: ScopeTree::empty(),
            stack: Vec::new(),
            context: DeclarationContext::Lexical,
            skip_binding: None,
            pending: Vec::new(),
        }
    }

    fn current_scope(&self) -> LexicalScopeId {
        self.stack
            .last()
            .map(|(id, _)| *id)
            .unwrap_or(ScopeTree::MODULE)
    }

    fn var_scope(&self) -> LexicalScopeId {
        for (id, _) in self.stack.iter().rev() {
            if self.tree.scope(*id).is_var_scope() {
                return *id;
            }
        }
        ScopeTree::MODULE
    }

    fn finish(mut self) -> ScopeTree {
        for reference in std::mem::take(&mut self.pending) {
            match self.tree.lookup(reference.scope, &reference.name) {
                Some(id) => self.tree.bindings[id.0 as usize]
                    .references
                    .push(reference.span),
                None => self.tree.unresolved.push(UnresolvedReference {
                    name: reference.name,
                    span: reference.span,
                }),
            }
        }
        self.tree
    }
}

impl<'a> Visit<'a> for Resolver {
    fn enter_scope(&mut self, flags: ScopeFlags, _scope_id: &Cell<Option<ScopeId>>) {
        let id = if flags.contains(ScopeFlags::Top) {
            ScopeTree::MODULE
        } else {
            let parent = self.current_scope();
            self.tree.push_scope(parent, flags)
        };
        self.stack.push((id, self.context));
        self.context = DeclarationContext::Lexical;
    }

    fn leave_scope(&mut self) {
        if let Some((_, context)) = self.stack.pop() {
            self.context = context;
        }
    }

    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        let previous = self.context;
        self.context = DeclarationContext::Import;
        walk::walk_import_declaration(self, decl);
        self.context = previous;
    }

    fn visit_variable_declaration(&mut self, decl: &VariableDeclaration<'a>) {
        let previous = self.context;
        self.context = if decl.kind == VariableDeclarationKind::Var {
            DeclarationContext::Var
        } else {
            DeclarationContext::Lexical
        };
        walk::walk_variable_declaration(self, decl);
        self.context = previous;
    }

    fn visit_function(&mut self, func: &Function<'a>, flags: ScopeFlags) {
        if let Some(id) = &func.id {
            // Expression names only bind inside the function itself; leaving
            // them undeclared resolves self-references outward, which can only
            // keep an import alive, never drop one.
            if matches!(
                func.r#type,
                FunctionType::FunctionDeclaration | FunctionType::TSDeclareFunction
            ) {
                let scope = self.current_scope();
                self.tree
                    .declare(scope, id.name.as_str(), BindingKind::Function, id.span);
            }
            self.skip_binding = Some(id.span);
        }
        walk::walk_function(self, func, flags);
    }

    fn visit_class(&mut self, class: &Class<'a>) {
        if let Some(id) = &class.id {
            if matches!(class.r#type, ClassType::ClassDeclaration) {
                let scope = self.current_scope();
                self.tree
                    .declare(scope, id.name.as_str(), BindingKind::Class, id.span);
            }
            self.skip_binding = Some(id.span);
        }
        walk::walk_class(self, class);
    }

    fn visit_binding_identifier(&mut self, ident: &BindingIdentifier<'a>) {
        if self.skip_binding == Some(ident.span) {
            self.skip_binding = None;
            return;
        }
        let (scope, kind) = match self.context {
            DeclarationContext::Var => (self.var_scope(), BindingKind::Var),
            DeclarationContext::Import => (self.current_scope(), BindingKind::Import),
            DeclarationContext::Lexical => (self.current_scope(), BindingKind::Lexical),
        };
        self.tree.declare(scope, ident.name.as_str(), kind, ident.span);
    }

    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        self.pending.push(PendingReference {
            name: ident.name.to_string(),
            scope: self.current_scope(),
            span: ident.span,
        });
    }
}
