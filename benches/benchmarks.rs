use candlepipe::indicators::{DirectionalMovement, Rsi};
use candlepipe::pipeline::StrategyProfile;
use candlepipe::series::CandleSeries;
use candlepipe::timeframe::Timeframe;
use candlepipe::types::Bar;
use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic(pair: &str, timeframe: Timeframe, count: usize) -> CandleSeries {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    CandleSeries::from_bars(
        pair,
        timeframe,
        (0..count).map(|i| {
            let c = 100.0 + ((i * 7) % 13) as f64 - ((i * 3) % 5) as f64;
            Bar::new(
                start + timeframe.duration() * i as i32,
                c,
                c + 1.5,
                c - 1.5,
                c,
                40.0,
            )
        }),
    )
    .unwrap()
}

fn benchmark_pipeline(c: &mut Criterion) {
    let pipeline = StrategyProfile::multi_timeframe().build_pipeline().unwrap();
    let base = synthetic("BTC/USDT", Timeframe::M15, 2000);
    let informative = synthetic("BTC/USDT", Timeframe::H1, 500);

    c.bench_function("multi_timeframe_2000_bars", |b| {
        b.iter(|| {
            let frame = pipeline
                .run(black_box(base.clone()), Some(black_box(&informative)))
                .unwrap();
            black_box(frame)
        });
    });

    let single = StrategyProfile::single_timeframe().build_pipeline().unwrap();
    c.bench_function("single_timeframe_2000_bars", |b| {
        b.iter(|| {
            let frame = single.run(black_box(base.clone()), None).unwrap();
            black_box(frame)
        });
    });
}

fn benchmark_indicators(c: &mut Criterion) {
    let series = synthetic("BTC/USDT", Timeframe::M15, 10_000);
    let closes = series.closes();

    c.bench_function("rsi_10k", |b| {
        b.iter(|| black_box(Rsi::compute(14, black_box(&closes))));
    });

    c.bench_function("adx_10k", |b| {
        b.iter(|| black_box(DirectionalMovement::compute(14, black_box(series.bars()))));
    });
}

criterion_group!(benches, benchmark_pipeline, benchmark_indicators);
criterion_main!(benches);
