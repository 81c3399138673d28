use std::io::{stdout, IsTerminal, Write};
use std::time::Instant;
use crossterm::{cursor, terminal, ExecutableCommand, QueueableCommand};
use crate::error::Result;
use crate::matcher::Matcher;
use crate::models::{Allocation, HasCapacity, Student, Supervisor};
use crate::parameters::MatchParameters;
use crate::persist::{self, AllocationOutcome, AllocationStore, MemoryStore, RunReport};
use crate::ranker::MatchConfig;
use crate::scope::{Scope, ScopeLocks};

pub fn generate_match_parameters(num_students: usize, num_supervisors: usize, scope: Scope) -> MatchParameters {
    let (students, supervisors) = generate_population_pool(num_students, num_supervisors);
    MatchParameters {
        scope,
        students,
        supervisors,
        config: MatchConfig::default(),
    }
}

pub fn generate_population_pool(num_students: usize, num_supervisors: usize) -> (Vec<Student>, Vec<Supervisor>) {
    let start = Instant::now();

    let students: Vec<Student> = (0..num_students)
        .map(|_| Student::sample_student())
        .collect();
    let supervisors: Vec<Supervisor> = (0..num_supervisors)
        .map(|_| Supervisor::sample_supervisor())
        .collect();

    log::info!("Created sample students and supervisors in {:.2?}.", start.elapsed());

    (students, supervisors)
}

/// Outcome of one coordinator-triggered run.
pub struct RunOutput {
    pub allocations: Vec<Allocation>,
    pub report: RunReport,
    /// Supervisors with their load after this run's writes.
    pub supervisors: Vec<Supervisor>,
}

/// Runs one allocation for the snapshot's scope and writes the result into a
/// fresh in-memory store seeded with the snapshot's supervisors.
pub fn run_allocation(parameters: &MatchParameters, locks: &ScopeLocks) -> Result<RunOutput> {
    let mut store = MemoryStore::new(&parameters.scope, parameters.supervisors.iter().cloned());
    let (allocations, report) = run_allocation_into(parameters, locks, &mut store)?;
    Ok(RunOutput {
        allocations,
        report,
        supervisors: store.supervisors(&parameters.scope),
    })
}

pub fn run_allocation_into<St>(parameters: &MatchParameters, locks: &ScopeLocks, store: &mut St)
    -> Result<(Vec<Allocation>, RunReport)>
where St: AllocationStore + ?Sized
{
    let MatchParameters {
        scope,
        students,
        supervisors,
        config
    } = parameters;

    // the capacity snapshot is only valid while no other run writes to this scope
    let _guard = locks.try_lock(scope)?;

    let start = Instant::now();
    let mut matcher = Matcher::with_config(config.clone());
    matcher.run_match(students, supervisors);
    log::info!("Finished match in {:.2?}.", start.elapsed());

    print_statistics(&matcher, students.len(), supervisors.len());

    let allocations = matcher.into_allocations();
    let mut outcomes: Vec<AllocationOutcome> = allocations.iter()
        .cloned()
        .map(AllocationOutcome::pending)
        .collect();
    animated_process(&mut outcomes,
                     |i, len|
                         format!("...Persisted {}/{} allocations ({:.0}%)...",
                                 i, len, percent(i, len)),
                     |o| persist::persist_one(&mut *store, scope, o)
    );

    let report = RunReport::new(scope.clone(), outcomes, students.len());
    log::info!("{} ({})", report.summary(), scope);
    Ok((allocations, report))
}

pub fn print_statistics(matcher: &Matcher<'_, Student, Supervisor>, num_students: usize, num_supervisors: usize) {
    let allocated = matcher.allocations.len();
    let unmatched = matcher.unmatched.len();
    let skipped = matcher.skipped_no_interest.len();
    let open_supervisors = matcher.capacity.len();
    let used_supervisors = matcher.capacity.iter()
        .filter(|s| (s.available as i64) < s.supervisor.available_slots())
        .count();

    println!("Allocated students: {} ({:.1}%), Unmatched: {} ({:.1}%), No research area: {} ({:.1}%)",
             allocated, percent(allocated, num_students),
             unmatched, percent(unmatched, num_students),
             skipped, percent(skipped, num_students)
    );
    println!("Supervisors with open slots: {} of {}, received students: {}, Unfilled slots: {}",
             open_supervisors, num_supervisors, used_supervisors, matcher.unfilled_slots()
    );

    if allocated > 0 {
        let mean = matcher.allocations.iter().map(|a| a.similarity_score).sum::<f64>() / allocated as f64;
        let perfect = matcher.allocations.iter().filter(|a| a.similarity_score >= 1.0).count();
        println!("Mean similarity score: {:.3}, perfect matches: {} ({:.1}%)",
                 mean, perfect, percent(perfect, allocated));

        let sample = &matcher.allocations[0];
        println!("Sample allocation: student {} -> supervisor {} (score {:.3})",
                 sample.student_id, sample.supervisor_id, sample.similarity_score);
    }
    println!();
}

fn percent(n: usize, of: usize) -> f64 {
    if of == 0 {
        return 0.0;
    }
    n as f64 / of as f64 * 100.0
}

/// Applies `f` to every element, redrawing a one-line progress message when
/// stdout is a terminal.
pub fn animated_process<T, S, F>(v: &mut [T], s: S, f: F)
where
    S: Fn(usize, usize) -> String,
    F: FnMut(&mut T)
{
    let mut stdout = stdout();
    if !stdout.is_terminal() {
        v.iter_mut().for_each(f);
        return;
    }
    animated_process_to(&mut stdout, v, s, f);
}

/// Like [`animated_process`] but draws into `out`. Every element is processed
/// even when drawing fails; the first failure switches the display off.
pub fn animated_process_to<W, T, S, F>(out: &mut W, v: &mut [T], s: S, mut f: F)
where
    W: Write + ?Sized,
    S: Fn(usize, usize) -> String,
    F: FnMut(&mut T)
{
    let len = v.len();
    let mut drawing = true;
    for (i, t) in v.iter_mut().enumerate() {
        f(t);
        if drawing {
            if let Err(e) = draw_progress(out, &s(i + 1, len)) {
                log::warn!("Progress display disabled: {}", e);
                drawing = false;
            }
        }
    }
    if drawing {
        if let Err(e) = out.execute(cursor::Show) {
            log::warn!("Could not restore cursor: {}", e);
        }
    }
}

fn draw_progress<W: Write + ?Sized>(out: &mut W, text: &str) -> std::io::Result<()> {
    out.queue(cursor::SavePosition)?;
    out.write_all(text.as_bytes())?;
    out.queue(cursor::RestorePosition)?;
    out.flush()?;
    out.queue(cursor::RestorePosition)?;
    out.queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
    Ok(())
}
