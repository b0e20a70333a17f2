use plotly::layout::{Axis, Layout};
use plotly::{Bar, BoxPlot, Plot};

use crate::benchmark::BenchmarkOutcome;

/// Box plot of the per-fold accuracies of every successful predictor.
pub fn plot_fold_accuracies(outcomes: &[BenchmarkOutcome], title: &str) -> Plot {
    let mut plot = Plot::new();
    for outcome in outcomes {
        if let Ok(result) = &outcome.outcome {
            let trace = BoxPlot::<f64, f64>::new(result.fold_accuracies.clone())
                .name(outcome.name.as_str());
            plot.add_trace(trace);
        }
    }

    let layout = Layout::new()
        .title(title)
        .x_axis(Axis::new().title("Classifier"))
        .y_axis(Axis::new().title("Fold accuracy").range(vec![0.0, 1.0]));
    plot.set_layout(layout);

    plot
}

/// Bar chart of the mean accuracy of every successful predictor.
pub fn plot_mean_accuracy(outcomes: &[BenchmarkOutcome], title: &str) -> Plot {
    let (names, means): (Vec<String>, Vec<f64>) = outcomes
        .iter()
        .filter_map(|o| o.outcome.as_ref().ok().map(|r| (o.name.clone(), r.mean_accuracy)))
        .unzip();

    let mut plot = Plot::new();
    plot.add_trace(Bar::new(names, means).name("Mean accuracy"));
    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title("Classifier"))
            .y_axis(Axis::new().title("Mean accuracy").range(vec![0.0, 1.0])),
    );
    plot
}
