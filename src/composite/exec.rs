use rayon::prelude::*;

use crate::{
    composite::settings::CompositeThreading,
    foundation::error::{BlendError, BlendResult},
};

/// Run `f(row_index, row_bytes)` over every `row_len`-byte row of `out`.
///
/// Rows are disjoint, so the parallel path writes exactly the bytes the sequential path does.
pub(crate) fn for_each_row<F>(
    out: &mut [u8],
    row_len: usize,
    threading: &CompositeThreading,
    f: F,
) -> BlendResult<()>
where
    F: Fn(usize, &mut [u8]) + Send + Sync,
{
    if row_len == 0 || out.is_empty() {
        return Ok(());
    }

    if !threading.parallel {
        out.chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| f(y, row));
        return Ok(());
    }

    let run = |out: &mut [u8]| {
        out.par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| f(y, row));
    };

    match threading.threads {
        None => {
            tracing::debug!(rows = out.len() / row_len, "compositing rows on global pool");
            run(out);
        }
        Some(n) => {
            let pool = build_thread_pool(n)?;
            tracing::debug!(
                rows = out.len() / row_len,
                threads = n,
                "compositing rows on dedicated pool"
            );
            pool.install(|| run(out));
        }
    }
    Ok(())
}

fn build_thread_pool(threads: usize) -> BlendResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(BlendError::validation(
            "composite threading 'threads' must be >= 1 when set",
        ));
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| BlendError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/composite/exec.rs"]
mod tests;
