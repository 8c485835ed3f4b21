// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Rust source emitter for strongly-typed implementations.
//!
//! Emits one self-contained file per descriptor: the implementation
//! struct, its two standard constructors, a `ConfigItem` impl and a
//! `register()` function that plugs the constructors into the
//! process-wide registry. Everything is `::tycon`-qualified so the file
//! compiles from any module in the host crate.

use crate::descriptor::{ConfigDescriptor, PropertyKind};

/// Field identifier for a property name. Property names come from
/// configuration schemas and are not guaranteed to be Rust identifiers.
pub fn field_ident(name: &str) -> String {
    let mut ident = String::with_capacity(name.len() + 2);
    ident.push_str("p_");
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            ident.push(c);
        } else {
            ident.push('_');
        }
    }
    ident
}

/// A `"a" | "b"` match pattern over property names, `None` when empty.
fn name_pattern(names: &[&str]) -> Option<String> {
    if names.is_empty() {
        None
    } else {
        Some(
            names
                .iter()
                .map(|n| format!("{:?}", n))
                .collect::<Vec<_>>()
                .join(" | "),
        )
    }
}

/// Emit the implementation source for a descriptor.
pub fn emit_item_impl(descriptor: &ConfigDescriptor) -> String {
    let impl_name = descriptor.impl_name();
    let type_name = descriptor.name();

    let mut plains: Vec<&str> = Vec::new();
    let mut lists: Vec<&str> = Vec::new();
    let mut maps: Vec<&str> = Vec::new();
    for property in descriptor.properties() {
        match property.kind() {
            PropertyKind::Plain => plains.push(property.name()),
            PropertyKind::List => lists.push(property.name()),
            PropertyKind::Map => maps.push(property.name()),
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "// Generated implementation for configuration type '{type_name}'.\n\
         // Regenerate with tycon-gen; do not edit by hand.\n\n"
    ));

    // Struct declaration.
    out.push_str(&format!(
        "#[derive(Debug)]\n\
         pub struct {impl_name} {{\n\
         \x20   descriptor: ::std::sync::Arc<::tycon::ConfigDescriptor>,\n\
         \x20   location: ::tycon::Location,\n\
         \x20   listeners: ::tycon::ListenerHandle,\n"
    ));
    for property in descriptor.properties() {
        let field = field_ident(property.name());
        let ty = match property.kind() {
            PropertyKind::Plain => "::tycon::ConfigValue",
            PropertyKind::List => "::tycon::ObservableList",
            PropertyKind::Map => "::tycon::ObservableMap",
        };
        out.push_str(&format!("    {field}: {ty},\n"));
    }
    out.push_str("}\n\n");

    // Constructors.
    out.push_str(&format!(
        "impl {impl_name} {{\n\
         \x20   fn property(\n\
         \x20       descriptor: &::std::sync::Arc<::tycon::ConfigDescriptor>,\n\
         \x20       name: &str,\n\
         \x20   ) -> ::std::sync::Arc<::tycon::PropertyDescriptor> {{\n\
         \x20       match descriptor.property(name) {{\n\
         \x20           Some(property) => property.clone(),\n\
         \x20           None => panic!(\n\
         \x20               \"implementation '{impl_name}' out of sync with descriptor '{{}}': missing property '{{}}'\",\n\
         \x20               descriptor.name(),\n\
         \x20               name\n\
         \x20           ),\n\
         \x20       }}\n\
         \x20   }}\n\n"
    ));

    out.push_str(&format!(
        "    pub fn ctor_new(\n\
         \x20       descriptor: &::std::sync::Arc<::tycon::ConfigDescriptor>,\n\
         \x20       location: ::tycon::Location,\n\
         \x20   ) -> Box<dyn ::tycon::ConfigItem> {{\n\
         \x20       let listeners = ::tycon::ListenerHandle::new();\n\
         \x20       Box::new(Self {{\n"
    ));
    for property in descriptor.properties() {
        let field = field_ident(property.name());
        let name = property.name();
        let init = match property.kind() {
            PropertyKind::Plain => {
                format!("Self::property(descriptor, {name:?}).default_value()")
            }
            PropertyKind::List => format!(
                "::tycon::ObservableList::new(Self::property(descriptor, {name:?}), listeners.handler())"
            ),
            PropertyKind::Map => format!(
                "::tycon::ObservableMap::new(Self::property(descriptor, {name:?}), listeners.handler())"
            ),
        };
        out.push_str(&format!("            {field}: {init},\n"));
    }
    out.push_str(
        "            descriptor: descriptor.clone(),\n\
         \x20           location,\n\
         \x20           listeners,\n\
         \x20       })\n\
         \x20   }\n\n",
    );

    out.push_str(
        "    pub fn ctor_copy(\n\
         \x20       descriptor: &::std::sync::Arc<::tycon::ConfigDescriptor>,\n\
         \x20       builder: &::tycon::ItemBuilder,\n\
         \x20   ) -> Result<Box<dyn ::tycon::ConfigItem>, ::tycon::ConfigError> {\n\
         \x20       let listeners = ::tycon::ListenerHandle::new();\n",
    );
    for property in descriptor.properties() {
        let field = field_ident(property.name());
        let name = property.name();
        match property.kind() {
            PropertyKind::Plain => out.push_str(&format!(
                "        let {field} = builder.plain_value(&Self::property(descriptor, {name:?}));\n"
            )),
            PropertyKind::List => out.push_str(&format!(
                "        let mut {field} = ::tycon::ObservableList::new(Self::property(descriptor, {name:?}), listeners.handler());\n\
                 \x20       {field}.replace(builder.list_values({name:?}).to_vec(), builder.is_set({name:?}))?;\n"
            )),
            PropertyKind::Map => out.push_str(&format!(
                "        let mut {field} = ::tycon::ObservableMap::new(Self::property(descriptor, {name:?}), listeners.handler());\n\
                 \x20       {field}.replace(builder.map_entries({name:?}).to_vec(), builder.is_set({name:?}))?;\n"
            )),
        }
    }
    out.push_str("        Ok(Box::new(Self {\n");
    for property in descriptor.properties() {
        out.push_str(&format!("            {},\n", field_ident(property.name())));
    }
    out.push_str(
        "            descriptor: descriptor.clone(),\n\
         \x20           location: builder.location().clone(),\n\
         \x20           listeners,\n\
         \x20       }))\n\
         \x20   }\n\
         }\n\n",
    );

    // Trait impl.
    out.push_str(&format!("impl ::tycon::ConfigItem for {impl_name} {{\n"));
    out.push_str(
        "    fn descriptor(&self) -> &::std::sync::Arc<::tycon::ConfigDescriptor> {\n\
         \x20       &self.descriptor\n\
         \x20   }\n\n\
         \x20   fn location(&self) -> &::tycon::Location {\n\
         \x20       &self.location\n\
         \x20   }\n\n",
    );

    // value()
    out.push_str(
        "    fn value(&self, name: &str) -> Result<::tycon::ConfigValue, ::tycon::ConfigError> {\n\
         \x20       match name {\n",
    );
    for name in &plains {
        let field = field_ident(name);
        out.push_str(&format!(
            "            {name:?} => Ok(self.{field}.clone()),\n"
        ));
    }
    let collections: Vec<&str> = lists.iter().chain(maps.iter()).copied().collect();
    if let Some(pattern) = name_pattern(&collections) {
        out.push_str(&format!(
            "            {pattern} => Err(::tycon::ConfigError::NotPlain(name.to_string())),\n"
        ));
    }
    out.push_str(
        "            _ => Err(::tycon::ConfigError::NoSuchProperty(name.to_string())),\n\
         \x20       }\n\
         \x20   }\n\n",
    );

    // update()
    out.push_str(
        "    fn update(\n\
         \x20       &mut self,\n\
         \x20       name: &str,\n\
         \x20       value: ::tycon::ConfigValue,\n\
         \x20   ) -> Result<::tycon::ConfigValue, ::tycon::ConfigError> {\n\
         \x20       match name {\n",
    );
    for name in &plains {
        let field = field_ident(name);
        out.push_str(&format!(
            "            {name:?} => {{\n\
             \x20               let property = Self::property(&self.descriptor, {name:?});\n\
             \x20               property.check_value(&value)?;\n\
             \x20               let old = ::std::mem::replace(&mut self.{field}, value.clone());\n\
             \x20               self.listeners.handler().lock().notify_update(&property, &old, &value);\n\
             \x20               Ok(old)\n\
             \x20           }}\n"
        ));
    }
    if let Some(pattern) = name_pattern(&collections) {
        out.push_str(&format!(
            "            {pattern} => Err(::tycon::ConfigError::NotPlain(name.to_string())),\n"
        ));
    }
    out.push_str(
        "            _ => Err(::tycon::ConfigError::NoSuchProperty(name.to_string())),\n\
         \x20       }\n\
         \x20   }\n\n",
    );

    // list()/list_mut()/map()/map_mut()
    let non_lists: Vec<&str> = plains.iter().chain(maps.iter()).copied().collect();
    let non_maps: Vec<&str> = plains.iter().chain(lists.iter()).copied().collect();
    emit_accessor(&mut out, "list", "&::tycon::ObservableList", "&self", "&self.", &lists, &non_lists, "NotAList");
    emit_accessor(&mut out, "list_mut", "&mut ::tycon::ObservableList", "&mut self", "&mut self.", &lists, &non_lists, "NotAList");
    emit_accessor(&mut out, "map", "&::tycon::ObservableMap", "&self", "&self.", &maps, &non_maps, "NotAMap");
    emit_accessor(&mut out, "map_mut", "&mut ::tycon::ObservableMap", "&mut self", "&mut self.", &maps, &non_maps, "NotAMap");

    out.push_str(
        "    fn listeners(&self) -> &::tycon::ListenerHandle {\n\
         \x20       &self.listeners\n\
         \x20   }\n\
         }\n\n",
    );

    // register()
    out.push_str(&format!(
        "pub fn register() {{\n\
         \x20   ::tycon::generate::register_impl(\n\
         \x20       {impl_name:?},\n\
         \x20       {impl_name}::ctor_new,\n\
         \x20       {impl_name}::ctor_copy,\n\
         \x20   );\n\
         }}\n"
    ));

    out
}

#[allow(clippy::too_many_arguments)]
fn emit_accessor(
    out: &mut String,
    method: &str,
    return_type: &str,
    receiver: &str,
    access: &str,
    matching: &[&str],
    wrong_kind: &[&str],
    error_variant: &str,
) {
    out.push_str(&format!(
        "    fn {method}({receiver}, name: &str) -> Result<{return_type}, ::tycon::ConfigError> {{\n\
         \x20       match name {{\n"
    ));
    for name in matching {
        let field = field_ident(name);
        out.push_str(&format!("            {name:?} => Ok({access}{field}),\n"));
    }
    if let Some(pattern) = name_pattern(wrong_kind) {
        out.push_str(&format!(
            "            {pattern} => Err(::tycon::ConfigError::{error_variant}(name.to_string())),\n"
        ));
    }
    out.push_str(
        "            _ => Err(::tycon::ConfigError::NoSuchProperty(name.to_string())),\n\
         \x20       }\n\
         \x20   }\n\n",
    );
}
