use jobtree_core::Job;

/// `count` jobs forming one tree where job `i` hangs under job `(i - 1) / fanout`.
///
/// The list is emitted leaves-first so the converter has to scan past most
/// of the input for every node.
pub fn synthetic_jobs(count: usize, fanout: usize) -> Vec<Job> {
    let fanout = fanout.max(1) as i64;
    let mut jobs: Vec<Job> = (0..count as i64)
        .map(|i| {
            let job = Job::new(format!("job_{i}")).with_id(i + 1).with_group(1);
            if i == 0 {
                job
            } else {
                job.with_parent((i - 1) / fanout + 1)
            }
        })
        .collect();
    jobs.reverse();
    jobs
}
