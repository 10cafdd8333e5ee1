//! Performance benchmarks for swizzling and dispatch through synthetic classes.
//!
//! - Swizzle: first swizzle (class already synthesized), re-swizzle, failed swizzle
//! - Dispatch: message sends on plain and swizzled objects, `send_super` chains
//!
//! ```bash
//! cargo bench --bench swizzle_benchmarks
//! ```

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use isa_swizzle::{ClassEntry, FieldEntry, ObjectEnv, ObjectHandle, Runtime, TypeHash, Value, ValueKind};
use std::hint::black_box;

struct Fixture {
    runtime: Runtime,
    base: TypeHash,
    flavor: TypeHash,
    wrapped: TypeHash,
    bad: TypeHash,
}

fn fixture() -> Fixture {
    let runtime = Runtime::new();
    let base = runtime
        .register_class(
            ClassEntry::new("Base")
                .with_base(runtime.root_class())
                .with_field(FieldEntry::new("id", ValueKind::Int))
                .with_method("describe", |_| Ok(Value::from("plain"))),
        )
        .unwrap();
    let flavor = runtime
        .define_template("Flavor", base)
        .method("describe", |_| Ok(Value::from("flavored")))
        .build()
        .unwrap();
    let wrapped = runtime
        .define_template("Wrapped", base)
        .method("describe", |ctx| ctx.send_super(&[]))
        .build()
        .unwrap();
    let bad = runtime
        .define_template("BadFlavor", base)
        .field("count", ValueKind::Int)
        .build()
        .unwrap();

    // Synthesize up front so the benches measure the steady state.
    let warm = runtime.instantiate(base).unwrap();
    runtime.swizzle(warm, flavor).unwrap();

    Fixture {
        runtime,
        base,
        flavor,
        wrapped,
        bad,
    }
}

fn swizzle_benchmarks(c: &mut Criterion) {
    let fx = fixture();
    let mut group = c.benchmark_group("swizzle");
    group.throughput(Throughput::Elements(1));

    // Fresh object, synthetic class already cached
    group.bench_function("first_swizzle_cached_class", |b| {
        b.iter_batched(
            || fx.runtime.instantiate(fx.base).unwrap(),
            |object| {
                let outcome = fx.runtime.swizzle(black_box(object), fx.flavor).unwrap();
                fx.runtime.release(object);
                black_box(outcome)
            },
            BatchSize::SmallInput,
        );
    });

    // Object already carries the tag
    let swizzled = fx.runtime.instantiate(fx.base).unwrap();
    fx.runtime.swizzle(swizzled, fx.flavor).unwrap();
    group.bench_function("reswizzle", |b| {
        b.iter(|| black_box(fx.runtime.swizzle(black_box(swizzled), fx.flavor).unwrap()));
    });

    // Template rejected by validation
    let plain = fx.runtime.instantiate(fx.base).unwrap();
    group.bench_function("incompatible_template", |b| {
        b.iter(|| black_box(fx.runtime.swizzle(black_box(plain), fx.bad).is_err()));
    });

    group.finish();
}

fn dispatch_benchmarks(c: &mut Criterion) {
    let fx = fixture();
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let send = |object: ObjectHandle| fx.runtime.send(black_box(object), "describe", &[]).unwrap();

    let plain = fx.runtime.instantiate(fx.base).unwrap();
    group.bench_function("plain_object", |b| {
        b.iter(|| black_box(send(plain)));
    });

    let flavored = fx.runtime.instantiate(fx.base).unwrap();
    fx.runtime.swizzle(flavored, fx.flavor).unwrap();
    group.bench_function("swizzled_object", |b| {
        b.iter(|| black_box(send(flavored)));
    });

    let wrapped = fx.runtime.instantiate(fx.base).unwrap();
    fx.runtime.swizzle(wrapped, fx.wrapped).unwrap();
    group.bench_function("swizzled_send_super", |b| {
        b.iter(|| black_box(send(wrapped)));
    });

    // Inherited from the root class, two levels above the synthetic class
    group.bench_function("inherited_root_method", |b| {
        b.iter(|| black_box(fx.runtime.send(black_box(flavored), "class_name", &[]).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, swizzle_benchmarks, dispatch_benchmarks);
criterion_main!(benches);
