//! Performance benchmarks for Pathways.
//!
//! This module contains benchmarks for:
//! - Workflow task toggles and derived completion
//! - Role-based filtering over large client lists
//! - Request dispatch through the service facade
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pathways::api::{ApiRequest, ApiService};
use pathways::core::{Actor, Client, Config, Store, ViewFilter};
use pathways::workflow::{ClientWorkflow, StageId, WorkflowRegistry};

// ============================================================================
// Mock Data Fixtures
// ============================================================================

mod fixtures {
    use super::*;

    const REPRESENTATIVES: [&str; 4] = ["John Robinson", "Jane Smith", "John Doe", "Emily Davis"];

    /// Build a store with `count` clients spread across four representatives.
    pub fn store_with_clients(count: usize) -> Store {
        let mut store = Store::new();
        for i in 0..count {
            let rep = REPRESENTATIVES[i % REPRESENTATIVES.len()];
            let _ = store.create_client(Client::new(format!("Client {i}"), rep));
        }
        store
    }

    /// A workflow with roughly half of its tasks done.
    pub fn half_done_workflow() -> ClientWorkflow {
        StageId::ALL.into_iter().fold(ClientWorkflow::new("bench"), |wf, stage| {
            let first = wf.stage(stage).tasks[0].id.clone();
            wf.toggle_task(stage.as_str(), &first)
        })
    }
}

// ============================================================================
// Workflow Benchmarks
// ============================================================================

fn bench_workflow(c: &mut Criterion) {
    let mut group = c.benchmark_group("workflow");
    let workflow = fixtures::half_done_workflow();

    group.bench_function("toggle_task", |b| {
        b.iter(|| black_box(workflow.toggle_task(black_box("planning"), black_box("8"))));
    });

    group.bench_function("toggle_unknown", |b| {
        b.iter(|| black_box(workflow.toggle_task(black_box("planning"), black_box("99"))));
    });

    group.bench_function("stage_summaries", |b| {
        b.iter(|| black_box(workflow.stage_summaries()));
    });

    group.bench_function("overall_completion", |b| {
        b.iter(|| black_box(workflow.overall_completion()));
    });

    group.bench_function("registry_toggle", |b| {
        let mut registry = WorkflowRegistry::new();
        b.iter(|| black_box(registry.toggle_task("c1", "initial", "2", None)));
    });

    group.finish();
}

// ============================================================================
// Filter Benchmarks
// ============================================================================

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("visibility");
    let filter = ViewFilter::default();
    let rep = Actor::new("Jane Smith", "Pathways Representative");
    let admin = Actor::new("Admin User", "Admin");

    for size in [100, 1_000, 10_000] {
        let store = fixtures::store_with_clients(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("representative", size), &store, |b, store| {
            b.iter(|| black_box(store.visible_clients(&filter, &rep)));
        });

        group.bench_with_input(BenchmarkId::new("admin", size), &store, |b, store| {
            b.iter(|| black_box(store.visible_clients(&filter, &admin)));
        });
    }

    group.finish();
}

// ============================================================================
// Service Benchmarks
// ============================================================================

fn bench_service(c: &mut Criterion) {
    let mut group = c.benchmark_group("service");
    let service = ApiService::new(Store::seeded(), &Config::default());

    let workflow = ApiRequest::get("/clients/3/workflow").unwrap();
    group.bench_function("get_workflow", |b| {
        b.iter(|| black_box(service.handle(&workflow)));
    });

    let clients =
        ApiRequest::get("/clients?visibleTo=John%20Robinson&role=Pathways%20Representative")
            .unwrap();
    group.bench_function("list_clients_filtered", |b| {
        b.iter(|| black_box(service.handle(&clients)));
    });

    group.bench_function("parse_request", |b| {
        b.iter(|| {
            black_box(ApiRequest::post(black_box(
                "/clients/1/workflow/stages/revised-planning/tasks/11/toggle?expectedVersion=3",
            )))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_workflow, bench_filter, bench_service);
criterion_main!(benches);
