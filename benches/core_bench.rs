//! Benchmarks for modweave core operations.
//!
//! Run with: cargo bench
//!
//! Results include 95% confidence intervals via Criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use modweave::core::builtin::CoreModule;
use modweave::core::deps::ModDeps;
use modweave::core::graph::ModuleGraph;
use modweave::core::handle::Mod;
use modweave::core::module::Module;
use modweave::core::namespace::Namespacer;
use modweave::core::parser::parse_manifest;
use modweave::core::resolver::install_order;
use modweave::core::source::ModuleSource;
use modweave::core::types::*;
use std::path::Path;
use std::sync::Arc;

/// Core plus `n` user modules, each exporting one object and one enum.
fn wide_deps(n: usize) -> ModDeps {
    let mut deps = ModDeps::new(vec![Mod::Core(Arc::new(CoreModule::builtin()))]);
    for i in 0..n {
        let name = format!("mod{i:03}");
        let module = Module::new(ModuleSource::local("/bench", &name))
            .with_name(&name)
            .with_original_name(&name)
            .with_object(TypeDef::object(ObjectTypeDef::new("Widget")))
            .and_then(|m| {
                m.with_enum(TypeDef::enumeration(
                    EnumTypeDef::new("Mode").with_value(EnumValueTypeDef::new("ON")),
                ))
            })
            .unwrap();
        deps = deps.append(Mod::User(Arc::new(module)));
    }
    deps
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("mod_type_for");
    for n in [1, 10, 50] {
        let deps = wide_deps(n);
        let last = TypeDef::list(TypeDef::object_ref(&format!("Mod{:03}Widget", n - 1)))
            .with_optional(true);
        group.bench_with_input(BenchmarkId::from_parameter(n), &last, |b, def| {
            b.iter(|| {
                let found = deps.mod_type_for(black_box(def)).unwrap();
                black_box(found);
            });
        });
    }
    group.finish();
}

fn bench_namespace(c: &mut Criterion) {
    let deps = wide_deps(10);
    let source = ModuleSource::local("/bench", "app");

    let mut group = c.benchmark_group("namespace_object");
    for fields in [4u32, 32, 128] {
        let mut obj = ObjectTypeDef::new("Config");
        for i in 0..fields {
            let ty = if i % 2 == 0 {
                TypeDef::object_ref("Options")
            } else {
                TypeDef::list(TypeDef::enum_ref("Mod001Mode"))
            };
            obj = obj.with_field(
                FieldTypeDef::new(&format!("field{i}"), ty)
                    .with_source_map(SourceMap::new("main.go", i, 1)),
            );
        }
        let def = TypeDef::object(obj);
        group.bench_with_input(BenchmarkId::from_parameter(fields), &def, |b, def| {
            b.iter(|| {
                let mut def = def.clone();
                Namespacer::new("app", "app", &source, Some(&deps))
                    .namespace(&mut def)
                    .unwrap();
                black_box(def);
            });
        });
    }
    group.finish();
}

fn chain_manifest(n: usize) -> String {
    let mut yaml = String::from("version: \"1.0\"\nname: bench\nmodules:\n");
    for i in 0..n {
        yaml.push_str(&format!("  m{i:04}:\n    source: ./m{i:04}\n    sdk: go\n"));
        if i > 0 {
            yaml.push_str(&format!("    dependencies: [m{:04}]\n", i - 1));
        }
        yaml.push_str("    objects:\n      Thing:\n        fields:\n          size: Int\n          ctr: Container?\n");
    }
    yaml
}

fn bench_install_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("install_order");
    for n in [10, 50, 100] {
        let manifest = parse_manifest(&chain_manifest(n)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &manifest, |b, manifest| {
            b.iter(|| {
                let order = install_order(black_box(manifest)).unwrap();
                black_box(order);
            });
        });
    }
    group.finish();
}

fn bench_load_and_install(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_and_install");
    for n in [10, 50] {
        let manifest = parse_manifest(&chain_manifest(n)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &manifest, |b, manifest| {
            b.iter(|| {
                let graph = ModuleGraph::load(black_box(manifest), Path::new("/bench")).unwrap();
                let server = graph.install().unwrap();
                black_box(server.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_resolve,
    bench_namespace,
    bench_install_order,
    bench_load_and_install
);
criterion_main!(benches);
