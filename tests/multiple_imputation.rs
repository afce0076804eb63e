use censored_imputation::{
    CensoredImputer, Error, Imputation, ImputerConfig, PosteriorDraws, PosteriorSampler,
    SamplerRequest, Table,
};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp, StandardNormal};
use std::sync::Mutex;

const N_ROWS: usize = 100;
const CORRELATION: f64 = 0.5;

const UPPER: [Option<f64>; 3] = [Some(0.8), Some(1.0), None];
const LOWER: [Option<f64>; 3] = [Some(-0.6), Some(-2.0), None];

/// Draws censored values from an exponential tail beyond their bound.
struct TailSampler {
    rng: Mutex<StdRng>,
    draws: usize,
}

impl TailSampler {
    fn new(seed: u64) -> Self {
        TailSampler {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            draws: 20,
        }
    }

    fn tail(&self, n: usize, bound: f64, direction: f64) -> Array2<f64> {
        let exp = Exp::new(2.0).unwrap();
        let mut rng = self.rng.lock().unwrap();
        Array2::from_shape_fn((self.draws, n), |_| bound + direction * exp.sample(&mut *rng))
    }
}

impl PosteriorSampler for TailSampler {
    fn sample(&self, request: &SamplerRequest<'_>) -> anyhow::Result<PosteriorDraws> {
        assert_eq!(request.x_obs.nrows(), request.n_obs + request.n_cens_left + request.n_cens_right);
        assert_eq!(request.y_obs.len(), request.n_obs);

        let left = if request.n_cens_left > 0 {
            Some(self.tail(request.n_cens_left, request.lower, -1.))
        } else {
            None
        };
        let right = if request.n_cens_right > 0 {
            Some(self.tail(request.n_cens_right, request.upper, 1.))
        } else {
            None
        };
        Ok(PosteriorDraws::new(left, right))
    }
}

/// Three standard normal columns with pairwise correlation 0.5.
fn correlated_columns(seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut columns = vec![Vec::with_capacity(N_ROWS); 3];
    for _ in 0..N_ROWS {
        let shared: f64 = StandardNormal.sample(&mut rng);
        for column in columns.iter_mut() {
            let own: f64 = StandardNormal.sample(&mut rng);
            column.push(CORRELATION.sqrt() * shared + (1. - CORRELATION).sqrt() * own);
        }
    }
    columns
}

fn censor(columns: &[Vec<f64>]) -> Table {
    let censored = columns.iter().enumerate().map(|(i, values)| {
        let clipped: Vec<f64> = values
            .iter()
            .map(|&v| {
                let v = UPPER[i].map_or(v, |upper| v.min(upper));
                LOWER[i].map_or(v, |lower| v.max(lower))
            })
            .collect();
        (i.to_string(), clipped)
    });
    Table::from_columns(censored.collect::<Vec<_>>()).unwrap()
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn multiple_imputation_of_correlated_data() {
    init_logging();
    let censored = censor(&correlated_columns(7));

    let config = ImputerConfig::default()
        .with_number_imputations(3)
        .with_sampler_iterations(500);
    let imputer = CensoredImputer::new(config, TailSampler::new(11)).unwrap();

    let tables = match imputer
        .impute_sweeps(censored.clone(), Some(&UPPER), Some(&LOWER), 2)
        .unwrap()
    {
        Imputation::Multiple(tables) => tables,
        Imputation::Single(_) => panic!("three imputations were requested"),
    };

    assert_eq!(tables.len(), 3);
    for table in tables {
        assert_eq!(table.n_rows(), N_ROWS);
        assert_eq!(table.column_names(), censored.column_names());

        let table = table.into_input_order();
        assert_eq!(table.column(2), censored.column(2));

        for column in 0..2 {
            let upper = UPPER[column].unwrap();
            let lower = LOWER[column].unwrap();
            for (&imputed, &recorded) in table.column(column).iter().zip(censored.column(column)) {
                if recorded >= upper {
                    assert!(imputed >= upper);
                } else if recorded <= lower {
                    assert!(imputed <= lower);
                } else {
                    assert_eq!(imputed, recorded);
                }
            }
        }
    }
}

#[test]
fn single_imputation_keeps_rows_together() {
    init_logging();
    let censored = censor(&correlated_columns(3));
    let imputer = CensoredImputer::new(ImputerConfig::default(), TailSampler::new(5)).unwrap();

    let completed = imputer
        .impute_sweeps(censored.clone(), Some(&UPPER), Some(&LOWER), 3)
        .unwrap()
        .single()
        .unwrap();

    // the uncensored column identifies each row
    for (row, &input_row) in completed.row_index().iter().enumerate() {
        assert_eq!(completed.column(2)[row], censored.column(2)[input_row]);
    }
}

#[test]
fn omitted_bounds_are_a_usage_error() {
    let censored = censor(&correlated_columns(1));
    let imputer = CensoredImputer::new(ImputerConfig::default(), TailSampler::new(1)).unwrap();

    let result = imputer.impute(censored, Some(&UPPER), None);
    assert!(matches!(result, Err(Error::Configuration(_))));
}
