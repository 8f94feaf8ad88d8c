use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pytok::tokenize;

/// Generate a realistic Python module mixing imports, control flow, classes,
/// f-strings, and numeric literals so every sub-scanner gets exercised.
fn make_python_file(index: usize) -> String {
    let hex = format!("{index:02X}");
    format!(
        r#"
import os
import sys
import re
from pathlib import Path
from collections import OrderedDict

CONSTANT_{i} = {i}

def compute_{i}(x, y):
    result = x + y * 0x{hex}
    name = f"item-{{result}}-{{y:>8}}"
    return result, name

class Widget_{i}:
    def __init__(self, value):
        self.value = value

    def render(self):
        if self.value > 0:
            return f"{{self.value:.2f}}"
        else:
            return "n/a"

for row in range(10):
    if row % 2 == 0:
        continue
    print(compute_{i}(row, row * 2))

p = Path(".")
d: OrderedDict = OrderedDict()
pattern = re.compile(r"\d+")
"#,
        i = index,
        hex = hex,
    )
}

fn bench_tokenize(c: &mut Criterion) {
    let corpus: Vec<String> = (0..50).map(make_python_file).collect();

    c.bench_function("tokenize_50_modules", |b| {
        b.iter(|| {
            for src in &corpus {
                for tok in tokenize(black_box(src)) {
                    black_box(tok.unwrap());
                }
            }
        });
    });

    let big_source: String = (0..200).map(make_python_file).collect::<Vec<_>>().join("\n");

    c.bench_function("tokenize_single_large_file", |b| {
        b.iter(|| {
            let mut count = 0usize;
            for tok in tokenize(black_box(&big_source)) {
                black_box(tok.unwrap());
                count += 1;
            }
            black_box(count);
        });
    });
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
