//! Bounded Nelder-Mead minimisation used to fit smoothing parameters.

/// Outcome of a Nelder-Mead run.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best point found.
    pub optimal_point: Vec<f64>,
    /// Objective value at `optimal_point`.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the simplex met the tolerance before `max_iter`.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence tolerance on both the value spread and the simplex size.
    pub tolerance: f64,
    /// Reflection coefficient (default: 1.0).
    pub reflection: f64,
    /// Expansion coefficient (default: 2.0).
    pub expansion: f64,
    /// Contraction coefficient (default: 0.5).
    pub contraction: f64,
    /// Shrink coefficient (default: 0.5).
    pub shrink: f64,
    /// Initial simplex step, relative to the starting coordinate (default: 0.05).
    pub initial_step: f64,
    /// Fresh simplexes built around the best point after convergence (default: 3).
    pub max_restarts: usize,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
            initial_step: 0.05,
            max_restarts: 3,
        }
    }
}

/// A simplex vertex and its objective value.
#[derive(Debug, Clone)]
struct Vertex {
    point: Vec<f64>,
    value: f64,
}

/// Minimise `objective` starting from `initial`.
///
/// `bounds`, when given, holds one `(min, max)` pair per coordinate and
/// every candidate point is clamped into the box before evaluation. After
/// convergence the search restarts from the best point (up to
/// `max_restarts` times) while that still improves the objective.
///
/// # Example
/// ```
/// use traffic_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 0.4).powi(2) + (x[1] - 0.2).powi(2),
///     &[0.5, 0.5],
///     Some(&[(0.0, 1.0), (0.0, 1.0)]),
///     NelderMeadConfig::default(),
/// );
///
/// assert!((result.optimal_point[0] - 0.4).abs() < 0.01);
/// assert!((result.optimal_point[1] - 0.2).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    if initial.is_empty() {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let evaluate = |point: Vec<f64>| -> Vertex {
        let point = clamp_to(point, bounds);
        let value = objective(&point);
        // NaN objectives sort last instead of poisoning the ordering.
        let value = if value.is_nan() { f64::INFINITY } else { value };
        Vertex { point, value }
    };

    let mut simplex = initial_simplex(initial, None, bounds, &config, &evaluate);
    let mut iterations = 0;
    let mut converged = run_simplex(&mut simplex, &config, &mut iterations, &evaluate);
    let mut best = best_vertex(simplex, initial);

    // Clamped candidates can flatten the simplex onto a bound face; a fresh
    // simplex around the best point lets the search leave that face again.
    for _ in 0..config.max_restarts {
        if !converged || iterations >= config.max_iter {
            break;
        }
        let mut simplex = initial_simplex(&best.point, Some(&best), bounds, &config, &evaluate);
        converged = run_simplex(&mut simplex, &config, &mut iterations, &evaluate);
        let candidate = best_vertex(simplex, &best.point);

        let improvement = best.value - candidate.value;
        if candidate.value < best.value {
            best = candidate;
        }
        if improvement <= config.tolerance {
            break;
        }
    }

    NelderMeadResult {
        optimal_point: best.point,
        optimal_value: best.value,
        iterations,
        converged,
    }
}

/// Build `n + 1` vertices around `origin`.
///
/// Within bounds the step is a share of the box width and points inward, so
/// a vertex sitting on a bound still spans the feasible region.
fn initial_simplex<E>(
    origin: &[f64],
    evaluated_origin: Option<&Vertex>,
    bounds: Option<&[(f64, f64)]>,
    config: &NelderMeadConfig,
    evaluate: &E,
) -> Vec<Vertex>
where
    E: Fn(Vec<f64>) -> Vertex,
{
    let n = origin.len();
    let mut simplex = Vec::with_capacity(n + 1);
    simplex.push(match evaluated_origin {
        Some(vertex) => vertex.clone(),
        None => evaluate(origin.to_vec()),
    });

    for i in 0..n {
        let mut point = origin.to_vec();
        let bound = bounds.and_then(|b| b.get(i)).copied();
        let step = match bound {
            Some((lo, hi)) if evaluated_origin.is_some() => {
                let step = config.initial_step * (hi - lo);
                if origin[i] + step > hi {
                    -step
                } else {
                    step
                }
            }
            _ if origin[i].abs() > 1e-10 => config.initial_step * origin[i].abs(),
            _ => config.initial_step,
        };
        point[i] += step;
        simplex.push(evaluate(point));
    }
    simplex
}

/// Iterate the simplex until it meets the tolerance or the shared
/// iteration budget runs out. Returns whether it converged.
fn run_simplex<E>(
    simplex: &mut [Vertex],
    config: &NelderMeadConfig,
    iterations: &mut usize,
    evaluate: &E,
) -> bool
where
    E: Fn(Vec<f64>) -> Vertex,
{
    let n = simplex.len() - 1;

    while *iterations < config.max_iter {
        *iterations += 1;
        simplex.sort_by(|a, b| a.value.total_cmp(&b.value));

        let best = simplex[0].value;
        let worst = simplex[n].value;
        let second_worst = simplex[n - 1].value;
        let centroid = centroid_without_last(simplex);

        let spread = simplex
            .iter()
            .map(|v| distance(&v.point, &centroid))
            .fold(0.0, f64::max);
        if worst - best < config.tolerance || spread < config.tolerance {
            return true;
        }

        let reflected = evaluate(toward(&centroid, &simplex[n].point, -config.reflection));

        if reflected.value < best {
            let expanded = evaluate(toward(&centroid, &reflected.point, config.expansion));
            simplex[n] = if expanded.value < reflected.value {
                expanded
            } else {
                reflected
            };
            continue;
        }

        if reflected.value < second_worst {
            simplex[n] = reflected;
            continue;
        }

        let contracted = if reflected.value < worst {
            let outside = evaluate(toward(&centroid, &reflected.point, config.contraction));
            (outside.value <= reflected.value).then_some(outside)
        } else {
            let inside = evaluate(toward(&centroid, &simplex[n].point, config.contraction));
            (inside.value < worst).then_some(inside)
        };

        if let Some(vertex) = contracted {
            simplex[n] = vertex;
            continue;
        }

        let anchor = simplex[0].point.clone();
        for vertex in simplex.iter_mut().skip(1) {
            let shrunk = toward(&anchor, &vertex.point, config.shrink);
            *vertex = evaluate(shrunk);
        }
    }
    false
}

fn best_vertex(simplex: Vec<Vertex>, fallback: &[f64]) -> Vertex {
    simplex
        .into_iter()
        .min_by(|a, b| a.value.total_cmp(&b.value))
        .unwrap_or(Vertex {
            point: fallback.to_vec(),
            value: f64::NAN,
        })
}

/// `origin + factor * (point - origin)`.
///
/// A negative factor reflects `point` through `origin`.
fn toward(origin: &[f64], point: &[f64], factor: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point)
        .map(|(o, p)| o + factor * (p - o))
        .collect()
}

/// Centroid of every vertex except the last (worst) one.
fn centroid_without_last(simplex: &[Vertex]) -> Vec<f64> {
    let kept = &simplex[..simplex.len() - 1];
    let dims = kept[0].point.len();
    let mut centroid = vec![0.0; dims];
    for vertex in kept {
        for (c, x) in centroid.iter_mut().zip(&vertex.point) {
            *c += x;
        }
    }
    for c in &mut centroid {
        *c /= kept.len() as f64;
    }
    centroid
}

fn clamp_to(mut point: Vec<f64>, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    if let Some(bounds) = bounds {
        for (x, &(lo, hi)) in point.iter_mut().zip(bounds) {
            *x = x.clamp(lo, hi);
        }
    }
    point
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
