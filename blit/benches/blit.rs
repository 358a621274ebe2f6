use blit::{BlitArea, ColorKey, PaletteOffset, PixelFormat, Point, Rect, Surface};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn sheet() -> Surface {
    let data: Vec<u8> = (0..256 * 64).map(|i| (i % 16) as u8).collect();
    Surface::from_linear(256, 64, PixelFormat::Indexed4, &data).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let src = sheet();
    let area = BlitArea::new(Point::new(0, 0), Point::new(0, 0), 240, 64);

    c.bench_function("blit_4bit_opaque", |b| {
        let mut dst = Surface::blank(240, 160, PixelFormat::Indexed4).unwrap();
        b.iter(|| blit::blit_4bit_opaque(&src, &mut dst, black_box(area)));
    });

    c.bench_function("blit_4bit_keyed", |b| {
        let mut dst = Surface::blank(240, 160, PixelFormat::Indexed4).unwrap();
        b.iter(|| blit::blit_4bit(&src, &mut dst, black_box(area), ColorKey::new(0)));
    });

    c.bench_function("blit_4bit_to_8bit", |b| {
        let mut dst = Surface::blank(240, 160, PixelFormat::Indexed8).unwrap();
        b.iter(|| {
            blit::blit_4bit_to_8bit(
                &src,
                &mut dst,
                black_box(area),
                ColorKey::DISABLED,
                PaletteOffset::new(3),
            );
        });
    });

    c.bench_function("fill_4bit", |b| {
        let mut dst = Surface::blank(240, 160, PixelFormat::Indexed4).unwrap();
        b.iter(|| blit::fill(&mut dst, black_box(Rect::new(0, 0, 240, 160)), 0x5));
    });

    c.bench_function("fill_8bit", |b| {
        let mut dst = Surface::blank(240, 160, PixelFormat::Indexed8).unwrap();
        b.iter(|| blit::fill(&mut dst, black_box(Rect::new(0, 0, 240, 160)), 0x5A));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
