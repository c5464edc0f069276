//! # SCIM Schema Validator
//!
//! Checks SCIM schema documents exactly the way the server checks them at startup,
//! and optionally validates a resource document against a schema.
//!
//! ## Usage
//!
//! ```bash
//! # one schema file
//! cargo run --bin schema-validator schemas/User.json
//!
//! # every *.json file of a directory, loaded together into one registry
//! cargo run --bin schema-validator ./schemas/
//!
//! # validate a resource against a schema and print its canonical form
//! cargo run --bin schema-validator schemas/User.json bjensen.json
//! ```
//!
//! ## Output
//!
//! ```text
//! Validating schema file: schemas/User.json
//! ✓ Schema is valid!
//!
//! Schema Summary:
//!   ID: urn:ietf:params:scim:schemas:core:2.0:User
//!   Name: User
//!   Attributes: 21
//!   Required attributes: userName
//!   Multi-valued attributes: 8
//!   Attribute types:
//!     - boolean: 1
//!     - complex: 9
//!     - reference: 1
//!     - string: 10
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: everything is valid
//! - `1`: a schema or the resource is invalid, or a file could not be read

use scim_provisioning::schema::{Schema, SchemaRegistry};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.as_slice() {
        [_, schema] => {
            let path = Path::new(schema);
            if path.is_file() {
                validate_single_file(path);
            } else if path.is_dir() {
                validate_directory(path);
            } else {
                eprintln!("Error: '{}' is not a valid file or directory", path.display());
                process::exit(1);
            }
        }
        [_, schema, resource] => validate_resource(Path::new(schema), Path::new(resource)),
        _ => {
            let program = args.first().map(String::as_str).unwrap_or("schema-validator");
            eprintln!("Usage: {program} <schema-file-or-directory> [resource-file]");
            eprintln!();
            eprintln!("Examples:");
            eprintln!("  {program} schemas/User.json");
            eprintln!("  {program} ./schemas/");
            eprintln!("  {program} schemas/User.json bjensen.json");
            process::exit(1);
        }
    }
}

fn validate_single_file(file_path: &Path) {
    println!("Validating schema file: {}", file_path.display());

    match SchemaRegistry::load_schema_from_file(file_path) {
        Ok(schema) => {
            println!("✓ Schema is valid!");
            print_schema_summary(&schema);
        }
        Err(e) => {
            eprintln!("❌ Schema validation failed: {e}");
            process::exit(1);
        }
    }
}

fn validate_directory(dir_path: &Path) {
    println!("Validating schemas in directory: {}", dir_path.display());

    match SchemaRegistry::from_schema_dir(dir_path) {
        Ok(registry) => {
            println!("✓ Schema registry loaded successfully");
            println!("  Total schemas loaded: {}", registry.len());
            for schema in registry.get_schemas() {
                println!("    - {} ({})", schema.name(), schema.id());
            }
        }
        Err(e) => {
            eprintln!("❌ Failed to load schema registry: {e}");
            process::exit(1);
        }
    }
}

fn validate_resource(schema_path: &Path, resource_path: &Path) {
    let schema = match SchemaRegistry::load_schema_from_file(schema_path) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("❌ Schema validation failed: {e}");
            process::exit(1);
        }
    };

    let resource = match fs::read_to_string(resource_path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(resource) => resource,
        Err(e) => {
            eprintln!("❌ Could not read {}: {e}", resource_path.display());
            process::exit(1);
        }
    };

    println!(
        "Validating {} against {}",
        resource_path.display(),
        schema.id()
    );
    match schema.validate(&resource) {
        Ok(canonical) => {
            println!("✓ Resource is valid!");
            match serde_json::to_string_pretty(&canonical.to_json()) {
                Ok(text) => println!("{text}"),
                Err(e) => eprintln!("Could not render canonical form: {e}"),
            }
        }
        Err(e) => {
            eprintln!("❌ {e}");
            process::exit(1);
        }
    }
}

fn print_schema_summary(schema: &Schema) {
    println!();
    println!("Schema Summary:");
    println!("  ID: {}", schema.id());
    println!("  Name: {}", schema.name());
    if let Some(description) = schema.description() {
        println!("  Description: {description}");
    }
    println!("  Attributes: {}", schema.attributes().len());

    let required: Vec<&str> = schema
        .attributes()
        .iter()
        .filter(|attr| attr.attribute().required)
        .map(|attr| attr.name())
        .collect();
    if !required.is_empty() {
        println!("  Required attributes: {}", required.join(", "));
    }

    let multi_valued = schema
        .attributes()
        .iter()
        .filter(|attr| attr.attribute().multi_valued)
        .count();
    println!("  Multi-valued attributes: {multi_valued}");

    let mut type_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for attr in schema.attributes() {
        *type_counts.entry(attr.type_name()).or_insert(0) += 1;
    }
    println!("  Attribute types:");
    for (attr_type, count) in type_counts {
        println!("    - {attr_type}: {count}");
    }
}
