use askama::Template;

use super::tstype::TsField;

/// A zod schema constant plus its inferred type export.
#[derive(Debug, Clone)]
pub struct ZodSchema {
    pub const_name: String,
    pub type_name: String,
    pub fields: Vec<ZodField>,
}

#[derive(Debug, Clone)]
pub struct ZodField {
    pub name: String,
    pub expr: String,
}

/// One express route registration line.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    /// Lowercased HTTP method, matching the express router API.
    pub method: String,
    /// Express-style path (`/orders/:id`).
    pub path: String,
    pub handler: String,
}

/// Domain entity interface.
#[derive(Template)]
#[template(path = "entity.ts.txt")]
pub struct EntityTemplate {
    pub name: String,
    pub fields: Vec<TsField>,
}

/// Repository interface with one method per verb observed in the group.
#[derive(Template)]
#[template(path = "repository.ts.txt")]
pub struct RepositoryTemplate {
    pub name: String,
    pub entity: String,
    pub entity_import: String,
    /// Precomputed method signatures, one per line.
    pub methods: Vec<String>,
}

/// zod request/response schema module for one resource.
#[derive(Template)]
#[template(path = "schemas.ts.txt")]
pub struct SchemasTemplate {
    pub schemas: Vec<ZodSchema>,
}

/// HTTP handler stub for one operation.
#[derive(Template)]
#[template(path = "handler.ts.txt")]
pub struct HandlerTemplate {
    pub name: String,
    pub method: String,
    pub path: String,
    /// Precomputed import lines.
    pub imports: Vec<String>,
}

/// Entity ↔ DTO converter module for one resource.
#[derive(Template)]
#[template(path = "converter.ts.txt")]
pub struct ConverterTemplate {
    pub entity: String,
    pub entity_import: String,
}

/// Express route registrations for one domain.
#[derive(Template)]
#[template(path = "routes.ts.txt")]
pub struct RoutesTemplate {
    pub router_name: String,
    pub imports: Vec<String>,
    pub routes: Vec<RouteEntry>,
}

/// Barrel file re-exporting generated modules.
#[derive(Template)]
#[template(path = "index.ts.txt")]
pub struct BarrelTemplate {
    /// Extensionless module paths, in export order.
    pub exports: Vec<String>,
}

/// vitest stub for one operation.
#[derive(Template)]
#[template(path = "test.ts.txt")]
pub struct TestStubTemplate {
    pub name: String,
    pub handler: String,
    pub handler_import: String,
    pub method: String,
    pub path: String,
}
