use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use renum_core::{Declaration, EnumType, FieldDef, Namespace, Value, ValueDecl};
use renum_test_helpers::mocks::mock_factory;

fn generate_enum(size: usize) -> EnumType {
    let (factory, _) = mock_factory();
    let mut ns = Namespace::root();
    factory
        .create(
            &mut ns,
            "Generated",
            Declaration::body(|b| {
                b.field(FieldDef::new("weight").with_default_fn(|v| Ok(Value::from(v.index()))))?;
                for i in 0..size {
                    b.value(ValueDecl::new(format!("ValueNumber{}", i)))?;
                }
                Ok(())
            }),
        )
        .expect("Declaration failed")
}

fn lookup_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [8, 64, 512].iter() {
        let generated = generate_enum(*size);
        let middle = format!("ValueNumber{}", size / 2);
        let snake = format!("value_number{}", size / 2);

        group.bench_with_input(BenchmarkId::new("by_index", size), size, |b, &size| {
            b.iter(|| black_box(generated.by_index(black_box((size / 2) as i64)).is_ok()));
        });
        group.bench_with_input(BenchmarkId::new("by_exact_name", size), &middle, |b, key| {
            b.iter(|| black_box(generated.by_exact_name(black_box(key)).is_some()));
        });
        group.bench_with_input(BenchmarkId::new("by_fuzzy", size), &snake, |b, key| {
            b.iter(|| black_box(generated.by_fuzzy(black_box(key)).is_some()));
        });
    }

    group.finish();
}

fn dispatch_benchmark(c: &mut Criterion) {
    let generated = generate_enum(64);
    let member = generated.first().expect("Empty enum");

    c.bench_function("dispatch_field_reader", |b| {
        b.iter(|| black_box(member.call(black_box("weight"), &[]).is_ok()));
    });
}

fn create_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for size in [8, 64, 512].iter() {
        group.bench_with_input(BenchmarkId::new("values", size), size, |b, &size| {
            b.iter(|| black_box(generate_enum(size).len()));
        });
    }

    group.finish();
}

criterion_group!(benches, lookup_benchmark, dispatch_benchmark, create_benchmark);
criterion_main!(benches);
