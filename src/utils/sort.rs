/// Sort a sparse vector held as SoA (inds/vals) by index.
/// - Sorts by inds ascending
/// - Reorders vals accordingly
/// - Stable: equal indices keep their input order
///
/// Small inputs use insertion sort, larger ones an LSD radix sort over the
/// four key bytes. Passes where every key shares the same byte are skipped.
pub fn sort_by_index<N: Copy>(inds: &mut [u32], vals: &mut [N]) {
    assert_eq!(inds.len(), vals.len());
    let n = inds.len();
    if n <= 1 {
        return;
    }
    if n <= 32 {
        insertion_sort(inds, vals);
        return;
    }
    radix_sort(inds, vals);
}

fn radix_sort<N: Copy>(inds: &mut [u32], vals: &mut [N]) {
    let n = inds.len();
    let mut inds_tmp = vec![0u32; n];
    let mut vals_tmp: Vec<N> = vals.to_vec();

    // true while the latest pass wrote into the scratch buffers
    let mut in_scratch = false;

    for shift in [0u32, 8, 16, 24] {
        let (src_inds, src_vals, dst_inds, dst_vals): (&[u32], &[N], &mut [u32], &mut [N]) =
            if in_scratch {
                (inds_tmp.as_slice(), vals_tmp.as_slice(), &mut *inds, &mut *vals)
            } else {
                (&*inds, &*vals, inds_tmp.as_mut_slice(), vals_tmp.as_mut_slice())
            };

        let mut count = [0usize; 256];
        for &k in src_inds {
            count[((k >> shift) & 0xFF) as usize] += 1;
        }
        if count.iter().any(|&c| c == n) {
            continue;
        }

        let mut sum = 0usize;
        for c in count.iter_mut() {
            let tmp = *c;
            *c = sum;
            sum += tmp;
        }

        for (idx, &k) in src_inds.iter().enumerate() {
            let b = ((k >> shift) & 0xFF) as usize;
            let pos = count[b];
            count[b] = pos + 1;
            dst_inds[pos] = k;
            dst_vals[pos] = src_vals[idx];
        }
        in_scratch = !in_scratch;
    }

    if in_scratch {
        inds.copy_from_slice(&inds_tmp);
        vals.copy_from_slice(&vals_tmp);
    }
}

fn insertion_sort<N: Copy>(inds: &mut [u32], vals: &mut [N]) {
    for i in 1..inds.len() {
        let mut j = i;
        while j > 0 && inds[j] < inds[j - 1] {
            inds.swap(j, j - 1);
            vals.swap(j, j - 1);
            j -= 1;
        }
    }
}
